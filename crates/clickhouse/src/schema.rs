//! Schema definitions for ClickHouse tables

/// Table schema definition
#[derive(Debug)]
pub struct TableSchema {
    /// Table name
    pub name: &'static str,
    /// Column definitions
    pub columns: &'static str,
    /// Table engine
    pub engine: &'static str,
    /// Sorting key; also the deduplication key for replacing engines
    pub order_by: &'static str,
}

/// Leaderboard table name
pub const POINTS_LEADERBOARD: &str = "points_leaderboard";
/// Profile table name
pub const WALLET_PROFILES: &str = "wallet_profiles";

/// Names of all tables
pub const TABLES: &[&str] = &[POINTS_LEADERBOARD, WALLET_PROFILES];

/// Schema definitions for tables.
///
/// Both tables keep one logical row per address: later writes replace earlier
/// ones once parts merge, and reads use `FINAL` to see the merged state.
pub const TABLE_SCHEMAS: &[TableSchema] = &[
    TableSchema {
        name: POINTS_LEADERBOARD,
        columns: "address FixedString(20),
                 points Float64,
                 last_updated UInt64",
        engine: "ReplacingMergeTree(last_updated)",
        order_by: "address",
    },
    TableSchema {
        name: WALLET_PROFILES,
        columns: "address FixedString(20),
                 display_name String,
                 updated_at UInt64",
        engine: "ReplacingMergeTree(updated_at)",
        order_by: "address",
    },
];
