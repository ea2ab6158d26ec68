//! Escalating cooldown for repeat offenders.
//!
//! A strike is registered each time an identity overflows its rate window.
//! Once an identity holds `MAX_ATTEMPTS` strikes it is refused until
//! `BASE_DELAY_MS * strikes` has passed since its last strike; after that the
//! strike count resets. Growth is linear in the strike count.

use dashmap::DashMap;

/// Strikes needed before the cooldown engages.
pub const MAX_ATTEMPTS: u32 = 5;

/// Cooldown per strike.
pub const BASE_DELAY_MS: u64 = 5_000;

/// Strike record for one identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackoffEntry {
    pub strikes: u32,
    pub last_strike_ms: u64,
}

impl BackoffEntry {
    pub fn is_engaged(&self) -> bool {
        self.strikes >= MAX_ATTEMPTS
    }

    pub fn cooldown_ms(&self) -> u64 {
        BASE_DELAY_MS.saturating_mul(u64::from(self.strikes))
    }

    fn cooling_down(&self, now: u64) -> bool {
        self.is_engaged() && now.saturating_sub(self.last_strike_ms) < self.cooldown_ms()
    }
}

/// Per-identity strike ledger.
#[derive(Debug, Default)]
pub struct BackoffController {
    entries: DashMap<String, BackoffEntry>,
}

impl BackoffController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `identity` may proceed at `now`.
    ///
    /// An engaged entry whose cooldown has elapsed is reset to zero.
    pub fn is_allowed(&self, identity: &str, now: u64) -> bool {
        let Some(mut entry) = self.entries.get_mut(identity) else {
            return true;
        };
        if !entry.is_engaged() {
            return true;
        }
        if entry.cooling_down(now) {
            return false;
        }

        tracing::debug!(client = %identity, strikes = entry.strikes, "Backoff cooldown elapsed");
        *entry = BackoffEntry::default();
        true
    }

    /// Record one rate-limit violation.
    pub fn register_strike(&self, identity: &str, now: u64) -> BackoffEntry {
        let mut entry = self.entries.entry(identity.to_string()).or_default();
        entry.strikes = entry.strikes.saturating_add(1);
        entry.last_strike_ms = now;
        *entry
    }

    pub fn strikes(&self, identity: &str) -> u32 {
        self.entry(identity).strikes
    }

    pub fn entry(&self, identity: &str) -> BackoffEntry {
        self.entries.get(identity).map(|e| *e).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries that behave exactly like a missing entry: zeroed ones and
    /// engaged ones whose cooldown is over. Strikes below the threshold are
    /// kept since they still count toward the next cooldown.
    pub fn sweep(&self, now: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            let zeroed = *entry == BackoffEntry::default();
            let expired = entry.is_engaged() && !entry.cooling_down(now);
            !(zeroed || expired)
        });
        let removed = before.saturating_sub(self.entries.len());

        tracing::debug!(
            removed,
            remaining = self.entries.len(),
            "Backoff sweep complete"
        );
        removed
    }
}
