//! Points Tracker Driver - runs the leaderboard sync on a fixed interval

use std::time::Duration;

use eyre::Result;
use tokio::{
    sync::broadcast,
    time::{self, MissedTickBehavior},
};
use tracing::{error, info};

use crate::PointsTracker;

/// Scheduler for [`PointsTracker::sync`].
///
/// Passes never overlap: the next tick is only awaited once the previous pass
/// has finished, and ticks missed while a pass was running are delayed rather
/// than fired in a burst.
#[derive(Debug)]
pub struct Driver {
    tracker: PointsTracker,
    interval: Duration,
}

impl Driver {
    /// Create a driver running a pass every `interval`, starting immediately.
    pub const fn new(tracker: PointsTracker, interval: Duration) -> Self {
        Self { tracker, interval }
    }

    /// Run until a message (or close) arrives on `shutdown_rx`.
    ///
    /// A shutdown request never interrupts a pass in progress.
    pub async fn start_with_shutdown(
        self,
        mut shutdown_rx: Option<broadcast::Receiver<()>>,
    ) -> Result<()> {
        info!(interval_secs = self.interval.as_secs(), "Starting sync scheduler");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = async {
                    if let Some(ref mut shutdown_rx) = shutdown_rx {
                        let _ = shutdown_rx.recv().await;
                    } else {
                        std::future::pending::<()>().await
                    }
                } => {
                    info!("Received shutdown signal, stopping sync scheduler");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
            }
        }

        Ok(())
    }

    async fn run_pass(&self) {
        if let Err(e) = self.tracker.sync().await {
            error!(err = %e, "Sync pass aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::Address;
    use primitives::PointsParams;

    use super::*;
    use crate::testing::{self, FakeChain, FakeStore, tokens};

    #[tokio::test(start_paused = true)]
    async fn runs_a_pass_per_tick_until_shutdown() {
        let holder = Address::repeat_byte(0x0a);
        let chain = Arc::new(FakeChain::new(1000).with_balance(holder, tokens(1)));
        let store = Arc::new(FakeStore::with_addresses([holder]));
        let config = testing::config(PointsParams::new(0, 1.0));
        let tracker = PointsTracker::new(Arc::clone(&chain) as _, Arc::clone(&store) as _, config);

        let (tx, rx) = broadcast::channel(1);
        let driver = Driver::new(tracker, Duration::from_secs(60));
        let handle = tokio::spawn(driver.start_with_shutdown(Some(rx)));

        // Ticks at 0s, 60s and 120s.
        time::sleep(Duration::from_secs(150)).await;
        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(store.writes().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_pass_does_not_stop_the_scheduler() {
        let store = Arc::new(FakeStore::with_addresses([Address::repeat_byte(0x0a)]));
        let chain = Arc::new(FakeChain::new(1000).with_broken_head());
        let tracker = PointsTracker::new(
            Arc::clone(&chain) as _,
            Arc::clone(&store) as _,
            testing::config(PointsParams::default()),
        );

        let (tx, rx) = broadcast::channel(1);
        let driver = Driver::new(tracker, Duration::from_secs(10));
        let handle = tokio::spawn(driver.start_with_shutdown(Some(rx)));

        time::sleep(Duration::from_secs(25)).await;
        drop(tx);
        handle.await.unwrap().unwrap();

        assert_eq!(chain.calls(), 3);
        assert!(store.writes().is_empty());
    }
}
