use alloy::primitives::Address;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use url::Url;

use crate::{
    models::{LeaderboardEntry, WalletProfileRow},
    reader::ClickhouseReader,
    writer::ClickhouseWriter,
};

/// Persistence needed by the points tracker.
///
/// Writes are last-write-wins per address; there is no locking between
/// concurrent writers.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Replace the points total for `address`.
    async fn upsert_points(
        &self,
        address: Address,
        points: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Whether `address` already has a leaderboard row.
    async fn has_entry(&self, address: Address) -> Result<bool>;

    /// Every address with a leaderboard row.
    async fn list_addresses(&self) -> Result<Vec<Address>>;

    /// Up to `limit` entries ordered by points descending, skipping `excluding`.
    async fn top_n(&self, limit: u64, excluding: Address) -> Result<Vec<LeaderboardEntry>>;

    /// Saved profile for `address`.
    async fn get_profile(&self, address: Address) -> Result<Option<WalletProfileRow>>;

    /// Replace the display name for `address`.
    async fn upsert_profile(
        &self,
        address: Address,
        display_name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;
}

/// [`LeaderboardStore`] backed by `ClickHouse`.
#[derive(Clone, Debug)]
pub struct ClickhouseStore {
    reader: ClickhouseReader,
    writer: ClickhouseWriter,
}

impl ClickhouseStore {
    /// Create reader and writer clients for the same database.
    pub fn new(url: Url, db_name: String, username: String, password: String) -> Result<Self> {
        let reader = ClickhouseReader::new(
            url.clone(),
            db_name.clone(),
            username.clone(),
            password.clone(),
        )?;
        let writer = ClickhouseWriter::new(url, db_name, username, password)?;
        Ok(Self { reader, writer })
    }

    /// Create the database and tables, dropping them first if `reset` is set.
    pub async fn init_db(&self, reset: bool) -> Result<()> {
        self.writer.init_db(reset).await
    }
}

#[async_trait]
impl LeaderboardStore for ClickhouseStore {
    async fn upsert_points(
        &self,
        address: Address,
        points: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.writer.upsert_points(address, points, updated_at).await
    }

    async fn has_entry(&self, address: Address) -> Result<bool> {
        self.reader.has_entry(address).await
    }

    async fn list_addresses(&self) -> Result<Vec<Address>> {
        self.reader.get_addresses().await
    }

    async fn top_n(&self, limit: u64, excluding: Address) -> Result<Vec<LeaderboardEntry>> {
        self.reader.get_top_entries(limit, excluding).await
    }

    async fn get_profile(&self, address: Address) -> Result<Option<WalletProfileRow>> {
        self.reader.get_profile(address).await
    }

    async fn upsert_profile(
        &self,
        address: Address,
        display_name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.writer.upsert_profile(address, display_name, updated_at).await
    }
}
