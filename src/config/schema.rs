//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::classifier::DEFAULT_STATIC_PREFIXES;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// HTTP listener and static front-end.
    pub server: ServerConfig,

    /// Session verification and path classes.
    pub auth: AuthConfig,

    /// Addresses exempt from throttling.
    pub trust: TrustConfig,

    /// Ledger maintenance.
    pub throttle: ThrottleConfig,

    /// Argo CD status upstream.
    pub argocd: ArgoCdConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Directory holding the pre-built dashboard front-end.
    pub static_dir: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            static_dir: "public".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Authentication gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret the identity provider signs session cookies with.
    pub secret: String,

    /// Name of the session cookie.
    pub cookie_name: String,

    /// Where unauthenticated requests are sent.
    pub login_path: String,

    /// Path prefixes reachable without a session.
    pub public_paths: Vec<String>,

    /// Path prefixes served without any gating.
    pub static_prefixes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            cookie_name: "session".to_string(),
            login_path: "/login".to_string(),
            public_paths: vec!["/login".to_string()],
            static_prefixes: DEFAULT_STATIC_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Trusted client addresses.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrustConfig {
    /// Exact addresses (e.g., "127.0.0.1").
    pub trusted_ips: Vec<String>,

    /// Address prefix for the home network (e.g., "192.168.0").
    pub home_prefix: String,
}

/// Throttle ledger maintenance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Seconds between stale-entry sweeps. 0 disables the sweep.
    pub sweep_interval_secs: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
        }
    }
}

/// Argo CD API access.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArgoCdConfig {
    /// Base URL of the Argo CD server (e.g., "https://argocd.lan").
    pub server: String,

    /// API bearer token.
    pub token: String,

    /// Base URL prepended to relative service links.
    pub base_url: String,

    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ArgoCdConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            token: String::new(),
            base_url: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
