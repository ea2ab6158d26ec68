//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: TRUSTED_IPS, HOME_IP_RANGE, ...)
//!     → validation.rs (semantic checks)
//!     → GateConfig (validated, immutable)
//!     → shared with all subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at process start; the trust set never changes
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ArgoCdConfig, AuthConfig, GateConfig, ObservabilityConfig, ServerConfig, ThrottleConfig,
    TrustConfig,
};
