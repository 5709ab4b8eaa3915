//! Validation functions for API query parameters

use crate::{ErrorResponse, state::MAX_LEADERBOARD_LIMIT};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters of the leaderboard endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct LeaderboardQuery {
    /// Number of entries to return, at most 25
    pub limit: Option<u64>,
}

/// Resolve the effective leaderboard size; oversized limits are clamped.
pub fn validate_limit(limit: Option<u64>) -> Result<u64, ErrorResponse> {
    match limit {
        Some(0) => Err(ErrorResponse::invalid_params("limit must be at least 1")),
        Some(limit) => Ok(limit.min(MAX_LEADERBOARD_LIMIT)),
        None => Ok(MAX_LEADERBOARD_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None).unwrap(), 25);
        assert_eq!(validate_limit(Some(10)).unwrap(), 10);
        assert_eq!(validate_limit(Some(1_000)).unwrap(), 25);
        assert_eq!(validate_limit(Some(0)).unwrap_err().r#type, "invalid-params");
    }
}
