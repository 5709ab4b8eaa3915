//! Common helper functions used across API endpoints

use crate::ErrorResponse;
use alloy_primitives::Address;
use chrono::{DateTime, SecondsFormat};
use clickhouse_lib::AddressBytes;
use driver::PointsError;

/// Parse and validate an address from a path segment
pub fn parse_address(addr_str: &str) -> Result<Address, ErrorResponse> {
    addr_str.trim().parse::<Address>().map_err(|e| {
        tracing::warn!(error = %e, address = addr_str, "Failed to parse address");
        ErrorResponse::invalid_params(format!("Invalid address format: {e}"))
    })
}

/// Format an address as lowercase hex with 0x prefix
pub fn format_address(addr: impl Into<AddressBytes>) -> String {
    addr.into().to_string()
}

/// Render a Unix millisecond timestamp as RFC 3339
pub fn format_millis(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Map a points calculation failure to its HTTP representation
pub fn points_error(error: PointsError) -> ErrorResponse {
    match error {
        PointsError::ChainRead(_) => ErrorResponse::chain_read_failed(error.to_string()),
        PointsError::Store(ref e) => database_error("save profile", e),
        e => ErrorResponse::invalid_params(e.to_string()),
    }
}

/// Create a database error response with logging
pub fn database_error(operation: &str, error: impl std::fmt::Display) -> ErrorResponse {
    tracing::error!(operation = operation, error = %error, "Database operation failed");
    ErrorResponse::database_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_valid() {
        let addr = "0x742d35Cc6634C0532925a3b844Bc9e7595f8e3A1";
        let result = parse_address(addr).unwrap();
        assert_eq!(format_address(result), addr.to_lowercase());
    }

    #[test]
    fn test_parse_address_invalid() {
        let err = parse_address("invalid_address").unwrap_err();
        assert_eq!(err.r#type, "invalid-params");
        assert!(err.detail.starts_with("Invalid address format"));
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_millis(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_points_error_mapping() {
        let err = points_error(PointsError::IneligibleAddress);
        assert_eq!(err.status, 400);
        assert_eq!(err.detail, "This address is not eligible for points tracking");

        let err = points_error(PointsError::ChainRead(eyre::eyre!("timeout")));
        assert_eq!(err.status, 502);
        assert_eq!(err.r#type, "chain-read-failed");

        let err = points_error(PointsError::Store(eyre::eyre!("down")));
        assert_eq!(err.status, 500);
    }
}
