//! Periodic sweep of the throttling ledgers.
//!
//! Only entries that are indistinguishable from absent ones are removed, so
//! the sweep bounds memory without changing any throttling decision.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::observability::metrics;
use crate::security::backoff::BackoffController;
use crate::security::clock::Clock;
use crate::security::rate_limit::SlidingWindowLimiter;

pub struct LedgerJanitor {
    limiter: Arc<SlidingWindowLimiter>,
    backoff: Arc<BackoffController>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl LedgerJanitor {
    pub fn new(
        limiter: Arc<SlidingWindowLimiter>,
        backoff: Arc<BackoffController>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            limiter,
            backoff,
            clock,
            interval,
        }
    }

    /// Sweep both ledgers once. Returns `(window_removed, backoff_removed)`.
    pub fn sweep_once(&self) -> (usize, usize) {
        let now = self.clock.now_ms();
        let window_removed = self.limiter.sweep(now);
        let backoff_removed = self.backoff.sweep(now);

        metrics::record_tracked_identities("window", self.limiter.len());
        metrics::record_tracked_identities("backoff", self.backoff.len());

        (window_removed, backoff_removed)
    }

    /// Sweep on every tick until the shutdown signal fires.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::info!(interval_secs = self.interval.as_secs(), "Ledger janitor started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let (window_removed, backoff_removed) = self.sweep_once();
                    if window_removed + backoff_removed > 0 {
                        tracing::debug!(window_removed, backoff_removed, "Swept stale throttle entries");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Ledger janitor stopping");
                    break;
                }
            }
        }
    }
}
