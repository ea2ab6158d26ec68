//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GateConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<GateConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load the configuration: optional TOML file, then process environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    let config = match path {
        Some(path) => read_config(path)?,
        None => GateConfig::default(),
    };
    let config = apply_env_overrides(config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so callers can supply their own map.
pub fn apply_env_overrides<F>(mut config: GateConfig, lookup: F) -> GateConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string());

    if let Some(addr) = get("BIND_ADDRESS").filter(|v| !v.is_empty()) {
        config.server.bind_address = addr;
    }
    if let Some(secret) = get("SESSION_SECRET")
        .filter(|v| !v.is_empty())
        .or_else(|| get("NEXTAUTH_SECRET").filter(|v| !v.is_empty()))
    {
        config.auth.secret = secret;
    }
    if let Some(list) = get("TRUSTED_IPS") {
        config.trust.trusted_ips = split_list(&list);
    }
    if let Some(prefix) = get("HOME_IP_RANGE") {
        config.trust.home_prefix = prefix;
    }
    if let Some(server) = get("ARGOCD_SERVER") {
        config.argocd.server = server;
    }
    if let Some(token) = get("ARGOCD_TOKEN") {
        config.argocd.token = token;
    }
    if let Some(base) = get("HOMESERVER_BASE_URL") {
        config.argocd.base_url = base;
    }
    if let Some(level) = get("LOG_LEVEL").filter(|v| !v.is_empty()) {
        config.observability.log_level = level;
    }

    config
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
