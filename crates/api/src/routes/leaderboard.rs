//! Leaderboard and sync endpoints

use crate::{
    helpers::{database_error, format_address, format_millis},
    state::ApiState,
    validation::{LeaderboardQuery, validate_limit},
};
use api_types::{ErrorResponse, LeaderboardItem, LeaderboardResponse, SyncResponse};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

#[utoipa::path(
    get,
    path = "/leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Top holders by points", body = LeaderboardResponse),
        (status = 400, description = "Invalid limit", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "points"
)]
/// Get the highest ranked addresses, pool excluded
pub async fn leaderboard(
    Query(params): Query<LeaderboardQuery>,
    State(state): State<ApiState>,
) -> Result<Json<LeaderboardResponse>, ErrorResponse> {
    let limit = validate_limit(params.limit)?;
    let rows =
        state.tracker.leaderboard(limit).await.map_err(|e| database_error("get leaderboard", e))?;

    let entries = rows
        .into_iter()
        .zip(1..)
        .map(|(row, rank)| LeaderboardItem {
            rank,
            address: format_address(row.address),
            display_name: row.display_name,
            points: row.points,
            last_updated: format_millis(row.last_updated),
        })
        .collect();
    Ok(Json(LeaderboardResponse { entries }))
}

#[utoipa::path(
    post,
    path = "/sync",
    responses(
        (status = 200, description = "Sync pass finished", body = SyncResponse),
        (status = 500, description = "Sync pass could not start", body = SyncResponse)
    ),
    tag = "points"
)]
/// Recompute the points of every address on the leaderboard
pub async fn sync(State(state): State<ApiState>) -> (StatusCode, Json<SyncResponse>) {
    match state.tracker.sync().await {
        Ok(report) => {
            (StatusCode::OK, Json(SyncResponse { success: true, message: report.message() }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Sync failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SyncResponse { success: false, message: format!("Sync failed: {e}") }),
            )
        }
    }
}
