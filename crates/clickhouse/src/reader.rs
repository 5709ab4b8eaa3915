//! `ClickHouse` reader functionality for the API and the sync job
//! Handles read-only leaderboard and profile queries

use alloy::primitives::Address;
use clickhouse::{Client, Row, sql::Identifier};
use derive_more::Debug;
use eyre::{Context, Result};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, error};
use url::Url;

use crate::{
    models::{AddressRow, LeaderboardEntry, RankedRow, WalletProfileRow},
    types::AddressBytes,
};

/// `ClickHouse` reader client (read-only operations)
#[derive(Clone, Debug)]
pub struct ClickhouseReader {
    /// Base client
    #[debug(skip)]
    base: Client,
    /// Database name
    db_name: String,
}

impl ClickhouseReader {
    /// Create a new `ClickHouse` reader client
    pub fn new(url: Url, db_name: String, username: String, password: String) -> Result<Self> {
        let client = Client::default().with_url(url).with_user(username).with_password(password);

        Ok(Self { base: client, db_name })
    }

    async fn fetch<R>(&self, sql: &'static str, query: clickhouse::query::Query) -> Result<Vec<R>>
    where
        R: Row + for<'b> Deserialize<'b>,
    {
        let start = Instant::now();
        let result = query.fetch_all::<R>().await;

        let duration_ms = start.elapsed().as_millis();
        match &result {
            Ok(rows) => {
                debug!(query = sql, duration_ms, rows = rows.len(), "ClickHouse query executed")
            }
            Err(e) => error!(query = sql, duration_ms, error = %e, "ClickHouse query failed"),
        }
        result.map_err(Into::into)
    }

    /// Every address that has a leaderboard row
    pub async fn get_addresses(&self) -> Result<Vec<Address>> {
        let sql = "SELECT DISTINCT address FROM ?.points_leaderboard";
        let query = self.base.query(sql).bind(Identifier(&self.db_name));

        let rows: Vec<AddressRow> =
            self.fetch(sql, query).await.context("fetching leaderboard addresses failed")?;
        Ok(rows.into_iter().map(|r| r.address.into()).collect())
    }

    /// Whether `address` already has a leaderboard row.
    pub async fn has_entry(&self, address: Address) -> Result<bool> {
        let sql = "SELECT address FROM ?.points_leaderboard WHERE address = unhex(?) LIMIT 1";
        let query = self
            .base
            .query(sql)
            .bind(Identifier(&self.db_name))
            .bind(AddressBytes::from(address).to_unprefixed_hex());

        let rows: Vec<AddressRow> =
            self.fetch(sql, query).await.context("checking leaderboard entry failed")?;
        Ok(!rows.is_empty())
    }

    /// Highest `limit` point totals, never including `excluding`.
    ///
    /// Rows with equal points come back in no particular order.
    pub async fn get_top_entries(
        &self,
        limit: u64,
        excluding: Address,
    ) -> Result<Vec<LeaderboardEntry>> {
        let sql = "SELECT l.address AS address, \
                          l.points AS points, \
                          l.last_updated AS last_updated, \
                          p.display_name AS display_name \
                   FROM ( \
                       SELECT address, points, last_updated \
                       FROM ?.points_leaderboard FINAL \
                       WHERE address != unhex(?) \
                   ) AS l \
                   LEFT JOIN ( \
                       SELECT address, display_name \
                       FROM ?.wallet_profiles FINAL \
                   ) AS p ON l.address = p.address \
                   ORDER BY l.points DESC \
                   LIMIT ?";
        let query = self
            .base
            .query(sql)
            .bind(Identifier(&self.db_name))
            .bind(AddressBytes::from(excluding).to_unprefixed_hex())
            .bind(Identifier(&self.db_name))
            .bind(limit);

        let rows: Vec<RankedRow> =
            self.fetch(sql, query).await.context("fetching top leaderboard entries failed")?;
        Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
    }

    /// Profile for `address`, if one was saved
    pub async fn get_profile(&self, address: Address) -> Result<Option<WalletProfileRow>> {
        let sql = "SELECT address, display_name, updated_at \
                   FROM ?.wallet_profiles FINAL \
                   WHERE address = unhex(?) \
                   LIMIT 1";
        let query = self
            .base
            .query(sql)
            .bind(Identifier(&self.db_name))
            .bind(AddressBytes::from(address).to_unprefixed_hex());

        let rows: Vec<WalletProfileRow> =
            self.fetch(sql, query).await.context("fetching wallet profile failed")?;
        Ok(rows.into_iter().next())
    }
}
