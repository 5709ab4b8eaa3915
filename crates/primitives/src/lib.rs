//! Core primitives for the points tracker.
/// Points accrual and level bucketing
pub mod points;
/// RPC transport retry policy
pub mod retries;

pub use points::{Level, PointsParams, PointsSnapshot, to_token_units};
