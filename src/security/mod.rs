//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Protected, authenticated request:
//!     → trust.rs (exempt trusted addresses)
//!     → backoff.rs (refuse identities still cooling down)
//!     → rate_limit.rs (sliding window, strike on overflow)
//!     → headers.rs (stamp security headers on the outcome)
//! ```
//!
//! # Design Decisions
//! - Ledgers are injected services with their own locking (DashMap)
//! - Time comes from an injected `Clock`, never read ambiently
//! - State is in-memory and per-process; a restart forgives everyone
//! - Client identity comes from X-Forwarded-For and is only meaningful
//!   behind a reverse proxy that overwrites that header

pub mod backoff;
pub mod clock;
pub mod headers;
pub mod janitor;
pub mod rate_limit;
pub mod trust;

pub use backoff::{BackoffController, BASE_DELAY_MS, MAX_ATTEMPTS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use headers::apply_security_headers;
pub use janitor::LedgerJanitor;
pub use rate_limit::{SlidingWindowLimiter, MAX_REQUESTS_PER_WINDOW, RATE_LIMIT_WINDOW_MS};
pub use trust::TrustRegistry;
