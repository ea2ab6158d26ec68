//! Static trust exemptions.
//!
//! Trusted identities skip the window limiter and the backoff controller.
//! The set is built once from configuration and never changes afterwards.

use std::collections::HashSet;

use crate::auth::identity::UNKNOWN_CLIENT;
use crate::config::TrustConfig;

/// Exact addresses plus one optional prefix (e.g. `192.168.0`).
#[derive(Debug, Clone, Default)]
pub struct TrustRegistry {
    exact: HashSet<String>,
    prefix: Option<String>,
}

impl TrustRegistry {
    pub fn new<I, S>(exact: I, prefix: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exact = exact
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let prefix = prefix
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Self { exact, prefix }
    }

    pub fn from_config(config: &TrustConfig) -> Self {
        Self::new(&config.trusted_ips, Some(config.home_prefix.clone()))
    }

    /// Returns true when `identity` is exempt from throttling.
    pub fn is_trusted(&self, identity: &str) -> bool {
        if identity.is_empty() || identity == UNKNOWN_CLIENT {
            return false;
        }
        if self.exact.contains(identity) {
            return true;
        }
        match &self.prefix {
            Some(prefix) => identity.starts_with(prefix.as_str()),
            None => false,
        }
    }

    pub fn exact_count(&self) -> usize {
        self.exact.len()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }
}
