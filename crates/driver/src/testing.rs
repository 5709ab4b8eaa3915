//! In-memory [`ChainReader`] and [`LeaderboardStore`] implementations.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use alloy_primitives::{Address, U256, address};
use async_trait::async_trait;
use chainio::ChainReader;
use chrono::{DateTime, Utc};
use clickhouse::{LeaderboardEntry, LeaderboardStore, WalletProfileRow};
use eyre::{Result, bail};
use primitives::PointsParams;

use crate::TrackerConfig;

/// Default token address.
pub const TOKEN: Address = address!("35efa4699edd7b468cbbf4fff7b6e7afc0a7ada6");
/// Default liquidity pool address.
pub const POOL: Address = address!("be01179f2291773d220eae55ee85b417f40342d0");

/// Configuration for the default token and pool with 18 decimals.
pub const fn config(params: PointsParams) -> TrackerConfig {
    TrackerConfig { token_address: TOKEN, pool_address: POOL, params, token_decimals: 18 }
}

/// `whole` tokens in the smallest unit of an 18-decimal token.
pub fn tokens(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Chain at a fixed height with fixed balances.
#[derive(Debug, Default)]
pub struct FakeChain {
    block_number: u64,
    broken_head: bool,
    balances: HashMap<Address, U256>,
    failing: HashSet<Address>,
    calls: AtomicUsize,
}

impl FakeChain {
    /// Chain whose head is `block_number` and where nobody holds tokens.
    pub fn new(block_number: u64) -> Self {
        Self { block_number, ..Default::default() }
    }

    /// Give `owner` a raw balance.
    pub fn with_balance(mut self, owner: Address, raw: U256) -> Self {
        self.balances.insert(owner, raw);
        self
    }

    /// Make balance reads for `owner` fail.
    pub fn failing_for(mut self, owner: Address) -> Self {
        self.failing.insert(owner);
        self
    }

    /// Make head block reads fail.
    pub fn with_broken_head(mut self) -> Self {
        self.broken_head = true;
        self
    }

    /// Number of reads served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn block_number(&self) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken_head {
            bail!("connection refused");
        }
        Ok(self.block_number)
    }

    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&owner) {
            bail!("execution reverted");
        }
        Ok(self.balances.get(&owner).copied().unwrap_or_default())
    }
}

/// Store keeping rows in memory and recording every points write.
#[derive(Debug, Default)]
pub struct FakeStore {
    rows: Mutex<BTreeMap<Address, (f64, u64)>>,
    profiles: Mutex<BTreeMap<Address, WalletProfileRow>>,
    writes: Mutex<Vec<(Address, f64)>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl FakeStore {
    /// Store with a zero-points row for each address.
    pub fn with_addresses(addresses: impl IntoIterator<Item = Address>) -> Self {
        let store = Self::default();
        lock(&store.rows).extend(addresses.into_iter().map(|a| (a, (0.0, 0))));
        store
    }

    /// Make every write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every read fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Points writes in the order they happened.
    pub fn writes(&self) -> Vec<(Address, f64)> {
        lock(&self.writes).clone()
    }

    /// Current points per address, ordered by address.
    pub fn points(&self) -> Vec<(Address, f64)> {
        lock(&self.rows).iter().map(|(a, (points, _))| (*a, *points)).collect()
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("database unavailable");
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("database unavailable");
        }
        Ok(())
    }
}

fn millis(at: DateTime<Utc>) -> u64 {
    u64::try_from(at.timestamp_millis()).unwrap_or_default()
}

#[async_trait]
impl LeaderboardStore for FakeStore {
    async fn upsert_points(
        &self,
        address: Address,
        points: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.check_write()?;
        lock(&self.rows).insert(address, (points, millis(updated_at)));
        lock(&self.writes).push((address, points));
        Ok(())
    }

    async fn has_entry(&self, address: Address) -> Result<bool> {
        self.check_read()?;
        Ok(lock(&self.rows).contains_key(&address))
    }

    async fn list_addresses(&self) -> Result<Vec<Address>> {
        self.check_read()?;
        Ok(lock(&self.rows).keys().copied().collect())
    }

    async fn top_n(&self, limit: u64, excluding: Address) -> Result<Vec<LeaderboardEntry>> {
        self.check_read()?;
        let profiles = lock(&self.profiles);
        let mut entries: Vec<_> = lock(&self.rows)
            .iter()
            .filter(|(address, _)| **address != excluding)
            .map(|(address, (points, last_updated))| LeaderboardEntry {
                address: (*address).into(),
                points: *points,
                last_updated: *last_updated,
                display_name: profiles.get(address).map(|p| p.display_name.clone()),
            })
            .collect();
        entries.sort_by(|a, b| b.points.total_cmp(&a.points));
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(entries)
    }

    async fn get_profile(&self, address: Address) -> Result<Option<WalletProfileRow>> {
        self.check_read()?;
        Ok(lock(&self.profiles).get(&address).cloned())
    }

    async fn upsert_profile(
        &self,
        address: Address,
        display_name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.check_write()?;
        let row = WalletProfileRow {
            address: address.into(),
            display_name: display_name.to_owned(),
            updated_at: millis(updated_at),
        };
        lock(&self.profiles).insert(address, row);
        Ok(())
    }
}
