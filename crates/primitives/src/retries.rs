//! Transport-level retry policy for JSON-RPC clients.

use std::time::Duration;

use alloy::transports::{
    TransportError,
    layers::{RateLimitRetryPolicy, RetryBackoffLayer, RetryPolicy},
};

/// Maximum number of retries for a single request.
const DEFAULT_MAX_RETRIES: u32 = 9;

/// Initial backoff in milliseconds; doubles on each retry.
const DEFAULT_INITIAL_BACKOFF_MS: u64 = 100;

/// Compute units per second assumed for the endpoint.
const DEFAULT_COMPUTE_UNITS_PER_SECOND: u64 = 100;

/// The default [`RetryBackoffLayer`] applied to every RPC client.
pub const DEFAULT_RETRY_LAYER: RetryBackoffLayer<RpcRetryPolicy> =
    RetryBackoffLayer::new_with_policy(
        DEFAULT_MAX_RETRIES,
        DEFAULT_INITIAL_BACKOFF_MS,
        DEFAULT_COMPUTE_UNITS_PER_SECOND,
        RpcRetryPolicy,
    );

/// Retries whatever alloy considers rate limiting, plus refused connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpcRetryPolicy;

impl RetryPolicy for RpcRetryPolicy {
    fn should_retry(&self, error: &TransportError) -> bool {
        RateLimitRetryPolicy::default().should_retry(error) || is_connection_refused(error)
    }

    fn backoff_hint(&self, error: &TransportError) -> Option<Duration> {
        RateLimitRetryPolicy::default().backoff_hint(error)
    }
}

/// Checks whether the error message contains "connection refused".
#[inline]
pub fn is_connection_refused<S: ToString>(e: S) -> bool {
    e.to_string().to_lowercase().contains("connection refused")
}
