//! `ClickHouse` persistence for the points leaderboard

/// Row types
pub mod models;
pub mod reader;
pub mod schema;
/// Storage capability used by the tracker
pub mod store;
/// Column wrapper types
pub mod types;
pub mod writer;

pub use models::{LeaderboardEntry, LeaderboardRow, WalletProfileRow};
pub use reader::ClickhouseReader;
pub use store::{ClickhouseStore, LeaderboardStore};
pub use types::AddressBytes;
pub use writer::ClickhouseWriter;
