//! Data types for the points tracker API.
//!
//! These structs define the JSON requests and responses of the API server.
//! They live in a separate crate so that consumers such as the leaderboard
//! front-end can depend on them without pulling in the server itself.

#![allow(missing_docs)]

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CalculateRequest {
    /// Wallet address, any hex case
    #[schema(example = "0x35efa4699edd7b468cbbf4fff7b6e7afc0a7ada6")]
    pub address: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PointsResponse {
    pub address: String,
    /// Balance in whole tokens
    pub balance: f64,
    pub points: f64,
    pub blocks_held: u64,
    /// 1 through 4
    pub level: u8,
    /// Head block the balance was read at
    pub block_number: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardItem {
    /// 1-based position
    pub rank: u64,
    pub address: String,
    pub display_name: Option<String>,
    pub points: f64,
    /// RFC 3339 timestamp of the last computation
    pub last_updated: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub address: String,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ParamsResponse {
    pub token_address: String,
    pub pool_address: String,
    pub start_block: u64,
    /// Points per whole token per block
    pub rate: f64,
}

/// Problem details body (RFC 7807) returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine readable error kind, e.g. `invalid-params`
    #[serde(rename = "type")]
    pub r#type: String,
    /// Short summary of the error kind
    pub title: String,
    /// HTTP status code
    pub status: u16,
    /// Message suitable for display
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(
        r#type: impl Into<String>,
        title: impl Into<String>,
        status: StatusCode,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self::new("invalid-params", "Invalid parameters", StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", "Not found", StatusCode::NOT_FOUND, detail)
    }

    pub fn chain_read_failed(detail: impl Into<String>) -> Self {
        Self::new("chain-read-failed", "Chain read failed", StatusCode::BAD_GATEWAY, detail)
    }

    pub fn database_error() -> Self {
        Self::new(
            "database-error",
            "Database error",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to query the database",
        )
    }

    pub fn rate_limited() -> Self {
        Self::new(
            "rate-limited",
            "Too many requests",
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests, please slow down",
        )
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_serializes_type_field() {
        let err = ErrorResponse::invalid_params("Please enter an address");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "invalid-params");
        assert_eq!(json["status"], 400);
        assert_eq!(json["detail"], "Please enter an address");
    }

    #[test]
    fn error_response_uses_its_status() {
        let resp = ErrorResponse::chain_read_failed("boom").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorResponse::database_error().status_code(), 500);
    }
}
