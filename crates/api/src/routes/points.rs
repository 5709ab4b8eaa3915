//! Points calculation and programme parameters

use crate::{
    helpers::{format_address, points_error},
    state::ApiState,
};
use api_types::{CalculateRequest, ErrorResponse, ParamsResponse, PointsResponse};
use axum::{Json, extract::State};

#[utoipa::path(
    post,
    path = "/calculate",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Current points of the address", body = PointsResponse),
        (status = 400, description = "Invalid or ineligible address", body = ErrorResponse),
        (status = 502, description = "Chain read failed", body = ErrorResponse)
    ),
    tag = "points"
)]
/// Read the balance of an address, compute its points and record them
pub async fn calculate(
    State(state): State<ApiState>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<PointsResponse>, ErrorResponse> {
    let calc = state.tracker.calculate(&req.address).await.map_err(points_error)?;
    Ok(Json(PointsResponse {
        address: format_address(calc.address),
        balance: calc.snapshot.balance,
        points: calc.snapshot.points,
        blocks_held: calc.snapshot.blocks_held,
        level: calc.snapshot.level.as_u8(),
        block_number: calc.block_number,
    }))
}

#[utoipa::path(
    get,
    path = "/params",
    responses(
        (status = 200, description = "Points programme parameters", body = ParamsResponse)
    ),
    tag = "points"
)]
/// Get the token, pool, start block and rate used for points
pub async fn params(State(state): State<ApiState>) -> Json<ParamsResponse> {
    let config = state.tracker.config();
    Json(ParamsResponse {
        token_address: format_address(config.token_address),
        pool_address: format_address(config.pool_address),
        start_block: config.params.start_block,
        rate: config.params.rate,
    })
}
