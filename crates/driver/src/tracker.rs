//! Single-address points calculation and the shared tracker handle.

use std::{fmt, sync::Arc};

use alloy_primitives::Address;
use chainio::{ChainReader, RpcChainReader};
use chrono::Utc;
use clickhouse::{ClickhouseStore, LeaderboardEntry, LeaderboardStore, WalletProfileRow};
use config::Opts;
use eyre::{Result, WrapErr};
use primitives::{PointsParams, PointsSnapshot, to_token_units};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::PointsError;

/// Maximum (and default) number of leaderboard entries returned.
pub const MAX_LEADERBOARD_LIMIT: u64 = 25;

/// Fixed settings of a tracker instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Token whose holders earn points
    pub token_address: Address,
    /// Liquidity pool address; never scored or ranked
    pub pool_address: Address,
    /// Start block and rate
    pub params: PointsParams,
    /// Decimals used to turn raw balances into whole tokens
    pub token_decimals: u8,
}

/// Outcome of a manual calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Calculation {
    /// Canonical address that was scored
    pub address: Address,
    /// Head block the balance was scored against
    pub block_number: u64,
    /// Derived standing
    #[serde(flatten)]
    pub snapshot: PointsSnapshot,
    /// Whether the result reached the leaderboard
    pub persisted: bool,
}

/// Handle combining a chain reader, a store and the points parameters.
///
/// Cheap to clone; the clients are shared.
#[derive(Clone)]
pub struct PointsTracker {
    pub(crate) chain: Arc<dyn ChainReader>,
    pub(crate) store: Arc<dyn LeaderboardStore>,
    config: TrackerConfig,
}

impl fmt::Debug for PointsTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointsTracker").field("config", &self.config).finish_non_exhaustive()
    }
}

impl PointsTracker {
    /// Create a tracker from explicit clients.
    pub fn new(
        chain: Arc<dyn ChainReader>,
        store: Arc<dyn LeaderboardStore>,
        config: TrackerConfig,
    ) -> Self {
        Self { chain, store, config }
    }

    /// Connect to the RPC endpoint and `ClickHouse` described by `opts`,
    /// running migrations unless they are disabled.
    pub async fn connect(opts: &Opts) -> Result<Self> {
        let store = ClickhouseStore::new(
            opts.clickhouse.url.clone(),
            opts.clickhouse.db.clone(),
            opts.clickhouse.username.clone(),
            opts.clickhouse.password.clone(),
        )?;
        if opts.skip_migrations {
            info!("Skipping database migrations");
        } else {
            store.init_db(opts.reset_db).await.wrap_err("database migrations failed")?;
        }

        let chain = RpcChainReader::new(opts.rpc.url.clone(), opts.token.token_address);
        let token_decimals = match opts.token.decimals {
            Some(decimals) => decimals,
            None => chain.decimals().await?,
        };

        let config = TrackerConfig {
            token_address: opts.token.token_address,
            pool_address: opts.token.pool_address,
            params: PointsParams::new(opts.token.start_block, opts.token.rate),
            token_decimals,
        };
        info!(
            token = %config.token_address,
            pool = %config.pool_address,
            start_block = config.params.start_block,
            rate = config.params.rate,
            token_decimals,
            "Points tracker configured"
        );

        Ok(Self::new(Arc::new(chain), Arc::new(store), config))
    }

    /// Tracker settings.
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Whether `address` is the reserved pool address.
    pub fn is_pool(&self, address: Address) -> bool {
        address == self.config.pool_address
    }

    /// Parse free-text input into an address eligible for points.
    ///
    /// Hex case does not matter. The pool address is rejected here, before any
    /// chain access.
    pub fn parse_address(&self, input: &str) -> Result<Address, PointsError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PointsError::MissingAddress);
        }

        let address = input
            .parse::<Address>()
            .map_err(|e| PointsError::InvalidAddress(e.to_string()))?;
        if self.is_pool(address) {
            return Err(PointsError::IneligibleAddress);
        }
        Ok(address)
    }

    /// Score `owner` against an already known head block.
    pub async fn snapshot_at(&self, owner: Address, block_number: u64) -> Result<PointsSnapshot> {
        let raw = self.chain.balance_of(owner).await?;
        let balance = to_token_units(raw, self.config.token_decimals)?;
        Ok(self.config.params.snapshot(balance, block_number))
    }

    /// Read, score and record one address.
    ///
    /// A positive result is written to the leaderboard, and so is a zero result
    /// for an address that already has a row. A failed write is logged and
    /// does not hide the computed result from the caller.
    pub async fn calculate(&self, input: &str) -> Result<Calculation, PointsError> {
        let address = self.parse_address(input)?;

        let block_number = self.chain.block_number().await.map_err(|e| {
            warn!(%address, error = %e, "Failed to read head block");
            PointsError::ChainRead(e)
        })?;
        let snapshot = self.snapshot_at(address, block_number).await.map_err(|e| {
            warn!(%address, error = %e, "Failed to read token balance");
            PointsError::ChainRead(e)
        })?;

        let mut persisted = false;
        if self.should_record(address, snapshot.points).await {
            match self.store.upsert_points(address, snapshot.points, Utc::now()).await {
                Ok(()) => persisted = true,
                Err(e) => error!(%address, error = %e, "Error updating leaderboard"),
            }
        }

        info!(
            %address,
            block_number,
            balance = snapshot.balance,
            points = snapshot.points,
            level = snapshot.level.as_u8(),
            persisted,
            "Calculated points"
        );
        Ok(Calculation { address, block_number, snapshot, persisted })
    }

    /// Zero results never create a row, they only overwrite one.
    async fn should_record(&self, address: Address, points: f64) -> bool {
        if points > 0.0 {
            return true;
        }
        match self.store.has_entry(address).await {
            Ok(exists) => exists,
            Err(e) => {
                error!(%address, error = %e, "Error checking leaderboard entry");
                false
            }
        }
    }

    /// Ranked leaderboard, pool excluded, capped at [`MAX_LEADERBOARD_LIMIT`].
    pub async fn leaderboard(&self, limit: u64) -> Result<Vec<LeaderboardEntry>> {
        self.store.top_n(limit.min(MAX_LEADERBOARD_LIMIT), self.config.pool_address).await
    }

    /// Saved profile for `address`.
    pub async fn profile(&self, address: Address) -> Result<Option<WalletProfileRow>> {
        self.store.get_profile(address).await
    }

    /// Save a display name for `address`, returning the trimmed name.
    pub async fn set_display_name(
        &self,
        address: Address,
        display_name: &str,
    ) -> Result<String, PointsError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(PointsError::EmptyDisplayName);
        }

        self.store.upsert_profile(address, display_name, Utc::now()).await.map_err(|e| {
            error!(%address, error = %e, "Error saving profile");
            PointsError::Store(e)
        })?;
        Ok(display_name.to_owned())
    }
}
