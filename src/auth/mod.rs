//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → identity.rs (client key from X-Forwarded-For)
//!     → session.rs (signed session cookie → authenticated subject or none)
//! ```
//!
//! # Design Decisions
//! - Session validity is binary; there is no refreshable state
//! - Verification sits behind a trait so the identity provider can change
//! - Token issuance lives with the identity provider, not here

pub mod identity;
pub mod session;

pub use identity::{client_identity, UNKNOWN_CLIENT};
pub use session::{Session, SessionVerifier, SignedCookieVerifier};
