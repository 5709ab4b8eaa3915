use clickhouse::Row;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::types::AddressBytes;

/// Points row, one per address
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct LeaderboardRow {
    /// Holder address
    pub address: AddressBytes,
    /// Last computed points total
    pub points: f64,
    /// Unix timestamp in milliseconds of the last computation
    pub last_updated: u64,
}

/// Display name chosen by a wallet owner
#[derive(Debug, Clone, Row, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct WalletProfileRow {
    /// Wallet address
    pub address: AddressBytes,
    /// Display name shown instead of the address
    pub display_name: String,
    /// Unix timestamp in milliseconds of the last change
    pub updated_at: u64,
}

/// Leaderboard row joined with the owner's profile
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Holder address
    pub address: AddressBytes,
    /// Last computed points total
    pub points: f64,
    /// Unix timestamp in milliseconds of the last computation
    pub last_updated: u64,
    /// Display name, if the owner set one
    pub display_name: Option<String>,
}

#[derive(Debug, Row, Serialize, Deserialize)]
pub(crate) struct RankedRow {
    pub(crate) address: AddressBytes,
    pub(crate) points: f64,
    pub(crate) last_updated: u64,
    /// Empty when the address has no profile (LEFT JOIN default).
    pub(crate) display_name: String,
}

impl From<RankedRow> for LeaderboardEntry {
    fn from(row: RankedRow) -> Self {
        let display_name = Some(row.display_name).filter(|name| !name.is_empty());
        Self {
            address: row.address,
            points: row.points,
            last_updated: row.last_updated,
            display_name,
        }
    }
}

#[derive(Debug, Row, Serialize, Deserialize)]
pub(crate) struct AddressRow {
    pub(crate) address: AddressBytes,
}
