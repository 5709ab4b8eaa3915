//! Points calculation, the batch sync job and its scheduler.

mod driver;
mod error;
mod sync;
mod tracker;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use driver::Driver;
pub use error::PointsError;
pub use sync::SyncReport;
pub use tracker::{Calculation, MAX_LEADERBOARD_LIMIT, PointsTracker, TrackerConfig};
