//! `ClickHouse` writer functionality for the points tracker
//! Handles database initialization, migrations, and upserts

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use clickhouse::{Client, Row};
use derive_more::Debug;
use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::{
    models::{LeaderboardRow, WalletProfileRow},
    schema::{POINTS_LEADERBOARD, TABLE_SCHEMAS, TABLES, TableSchema, WALLET_PROFILES},
};

/// Convert a timestamp into the millisecond representation stored in tables.
pub(crate) fn to_millis(ts: DateTime<Utc>) -> u64 {
    u64::try_from(ts.timestamp_millis()).unwrap_or_default()
}

/// `ClickHouse` writer client (data insertion and migrations)
#[derive(Clone, Debug)]
pub struct ClickhouseWriter {
    /// Base client
    #[debug(skip)]
    base: Client,
    /// Database name
    db_name: String,
}

impl ClickhouseWriter {
    /// Create a new `ClickHouse` writer client
    pub fn new(url: Url, db_name: String, username: String, password: String) -> Result<Self> {
        let client = Client::default()
            .with_url(url)
            .with_database(db_name.clone())
            .with_user(username)
            .with_password(password);

        Ok(Self { base: client, db_name })
    }

    /// Create a table with the given schema
    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {}.{} (
                {}
            ) ENGINE = {}
            ORDER BY ({})",
            self.db_name, schema.name, schema.columns, schema.engine, schema.order_by
        );

        self.base
            .query(&query)
            .execute()
            .await
            .wrap_err_with(|| format!("Failed to create {} table", schema.name))
    }

    /// Drop a table if it exists
    async fn drop_table(&self, table_name: &str) -> Result<()> {
        self.base
            .query(&format!("DROP TABLE IF EXISTS {}.{}", self.db_name, table_name))
            .execute()
            .await
            .wrap_err_with(|| format!("Failed to drop {} table", table_name))
    }

    /// Initialize database and optionally reset
    pub async fn init_db(&self, reset: bool) -> Result<()> {
        self.base
            .query(&format!("CREATE DATABASE IF NOT EXISTS {}", self.db_name))
            .execute()
            .await?;

        if reset {
            for table in TABLES {
                self.drop_table(table).await?;
            }
            info!(db_name = %self.db_name, "Database reset complete");
        }

        self.init_schema().await
    }

    /// Create every table that does not exist yet
    pub async fn init_schema(&self) -> Result<()> {
        for schema in TABLE_SCHEMAS {
            self.create_table(schema).await?;
        }
        info!(db_name = %self.db_name, tables = TABLE_SCHEMAS.len(), "Schema ready");
        Ok(())
    }

    async fn insert_row<T: Row + Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let client = self.base.clone().with_database(&self.db_name);
        let mut insert = client.insert(table)?;
        insert.write(row).await?;
        insert.end().await.wrap_err_with(|| format!("Failed to insert into {table}"))
    }

    /// Write the latest points total for `address`, replacing any previous row
    pub async fn upsert_points(
        &self,
        address: Address,
        points: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let row = LeaderboardRow {
            address: address.into(),
            points,
            last_updated: to_millis(updated_at),
        };
        self.insert_row(POINTS_LEADERBOARD, &row).await?;
        debug!(%address, points, "Upserted points");
        Ok(())
    }

    /// Write the display name for `address`, replacing any previous one
    pub async fn upsert_profile(
        &self,
        address: Address,
        display_name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let row = WalletProfileRow {
            address: address.into(),
            display_name: display_name.to_owned(),
            updated_at: to_millis(updated_at),
        };
        self.insert_row(WALLET_PROFILES, &row).await?;
        debug!(%address, display_name, "Upserted wallet profile");
        Ok(())
    }
}
