//! Wallet profile endpoints

use crate::{
    helpers::{database_error, format_address, parse_address, points_error},
    state::ApiState,
};
use api_types::{ErrorResponse, ProfileResponse, UpdateProfileRequest};
use axum::{
    Json,
    extract::{Path, State},
};

#[utoipa::path(
    get,
    path = "/profiles/{address}",
    params(("address" = String, Path, description = "Wallet address")),
    responses(
        (status = 200, description = "Saved profile", body = ProfileResponse),
        (status = 400, description = "Malformed address", body = ErrorResponse),
        (status = 404, description = "No profile saved", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "profiles"
)]
/// Get the display name saved for an address
pub async fn get_profile(
    Path(address): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<ProfileResponse>, ErrorResponse> {
    let address = parse_address(&address)?;
    let profile =
        state.tracker.profile(address).await.map_err(|e| database_error("get profile", e))?;

    profile
        .map(|p| {
            Json(ProfileResponse {
                address: format_address(p.address),
                display_name: p.display_name,
            })
        })
        .ok_or_else(|| ErrorResponse::not_found("No profile saved for this address"))
}

#[utoipa::path(
    put,
    path = "/profiles/{address}",
    params(("address" = String, Path, description = "Wallet address")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Saved profile", body = ProfileResponse),
        (status = 400, description = "Malformed address or empty name", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    ),
    tag = "profiles"
)]
/// Save the display name shown for an address on the leaderboard
pub async fn put_profile(
    Path(address): Path<String>,
    State(state): State<ApiState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ErrorResponse> {
    let address = parse_address(&address)?;
    let display_name =
        state.tracker.set_display_name(address, &req.display_name).await.map_err(points_error)?;
    Ok(Json(ProfileResponse { address: format_address(address), display_name }))
}
