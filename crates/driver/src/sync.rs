//! Batch recomputation of every leaderboard address.

use std::collections::BTreeSet;

use chrono::Utc;
use eyre::{Result, WrapErr};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::PointsTracker;

/// Aggregate outcome of one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Head block every address was scored against
    pub block_number: u64,
    /// Distinct addresses found in the store
    pub total: usize,
    /// Addresses whose points were rewritten
    pub updated: usize,
    /// Addresses left untouched on purpose (the pool)
    pub skipped: usize,
    /// Addresses whose update failed
    pub failed: usize,
}

impl SyncReport {
    /// Human readable summary.
    pub fn message(&self) -> String {
        format!(
            "Leaderboard synced at block {}: {} updated, {} skipped, {} failed",
            self.block_number, self.updated, self.skipped, self.failed
        )
    }
}

impl PointsTracker {
    /// Recompute and overwrite the points of every stored address.
    ///
    /// The head block is read once and shared by the whole pass. Addresses are
    /// processed one at a time; a failing address is logged and left as it
    /// was. Only a failure to read the head block or to list the addresses
    /// aborts the pass.
    pub async fn sync(&self) -> Result<SyncReport> {
        let block_number =
            self.chain.block_number().await.wrap_err("failed to read head block for sync")?;
        let addresses: BTreeSet<_> = self
            .store
            .list_addresses()
            .await
            .wrap_err("failed to list leaderboard addresses")?
            .into_iter()
            .collect();

        info!(block_number, count = addresses.len(), "Starting leaderboard sync");
        let mut report = SyncReport { block_number, total: addresses.len(), ..Default::default() };

        for address in addresses {
            if self.is_pool(address) {
                debug!(%address, "Skipping pool address");
                report.skipped += 1;
                continue;
            }

            let snapshot = match self.snapshot_at(address, block_number).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(%address, error = %e, "Failed to recompute points");
                    report.failed += 1;
                    continue;
                }
            };

            match self.store.upsert_points(address, snapshot.points, Utc::now()).await {
                Ok(()) => {
                    debug!(%address, points = snapshot.points, "Updated points");
                    report.updated += 1;
                }
                Err(e) => {
                    warn!(%address, error = %e, "Failed to store points");
                    report.failed += 1;
                }
            }
        }

        info!(
            block_number,
            updated = report.updated,
            skipped = report.skipped,
            failed = report.failed,
            "Leaderboard sync finished"
        );
        Ok(report)
    }
}
