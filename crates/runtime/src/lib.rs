//! Runtime utilities for the points tracker services.

/// Health check endpoint
pub mod health;
/// Fixed window request limiter
pub mod rate_limiter;
/// SIGINT / SIGTERM handling
pub mod shutdown;
