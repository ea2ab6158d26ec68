//! Per-identity sliding window rate limiter.
//!
//! Every identity owns a time-ordered ledger of request timestamps. A check
//! trims the ledger to the trailing window, records the new request and
//! compares the ledger length against the limit. The window is continuous,
//! so there are no burst artifacts at bucket boundaries.

use std::collections::VecDeque;

use dashmap::DashMap;

/// Length of the trailing window (15 minutes).
pub const RATE_LIMIT_WINDOW_MS: u64 = 15 * 60_000;

/// Maximum requests per identity inside one window, inclusive.
pub const MAX_REQUESTS_PER_WINDOW: usize = 100;

/// Sliding window limiter keyed by client identity.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    ledgers: DashMap<String, VecDeque<u64>>,
    window_ms: u64,
    max_requests: usize,
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl SlidingWindowLimiter {
    pub fn new() -> Self {
        Self::with_limits(RATE_LIMIT_WINDOW_MS, MAX_REQUESTS_PER_WINDOW)
    }

    pub fn with_limits(window_ms: u64, max_requests: usize) -> Self {
        Self {
            ledgers: DashMap::new(),
            window_ms,
            max_requests,
        }
    }

    /// Record a request at `now` and report whether it fits in the window.
    ///
    /// The timestamp is recorded even when the request is rejected.
    pub fn check(&self, identity: &str, now: u64) -> bool {
        let mut ledger = self.ledgers.entry(identity.to_string()).or_default();
        prune(&mut ledger, now, self.window_ms);
        ledger.push_back(now);
        ledger.len() <= self.max_requests
    }

    /// Number of timestamps currently recorded for `identity`.
    pub fn recorded(&self, identity: &str) -> usize {
        self.ledgers.get(identity).map(|l| l.len()).unwrap_or(0)
    }

    /// Number of identities with a ledger.
    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }

    /// Drop identities whose whole ledger has aged out of the window.
    ///
    /// Such a ledger would be emptied by the next check anyway, so removing
    /// it is not observable. Returns the number of identities removed.
    pub fn sweep(&self, now: u64) -> usize {
        let before = self.ledgers.len();
        let cutoff = now.saturating_sub(self.window_ms);
        self.ledgers
            .retain(|_, ledger| ledger.back().is_some_and(|&last| last > cutoff));
        let removed = before.saturating_sub(self.ledgers.len());

        tracing::debug!(
            removed,
            remaining = self.ledgers.len(),
            "Rate window sweep complete"
        );
        removed
    }
}

/// Trim every timestamp `<= now - window` from the front of the ledger.
fn prune(ledger: &mut VecDeque<u64>, now: u64, window_ms: u64) {
    let cutoff = now.saturating_sub(window_ms);
    while ledger.front().is_some_and(|&ts| ts <= cutoff) {
        ledger.pop_front();
    }
}
