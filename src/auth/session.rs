//! Session token verification.
//!
//! The gate only needs a yes/no answer ("is there an authenticated subject?").
//! Issuing tokens is the identity provider's job; this module verifies them.
//!
//! # Token format
//! ```text
//! <subject>.<expires_unix_secs>.<hex(hmac_sha256(secret, "<subject>.<expires>"))>
//! ```
//! carried in a cookie (default name `session`).

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::COOKIE, HeaderMap};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::AuthConfig;
use crate::security::clock::Clock;

type HmacSha256 = Hmac<Sha256>;

/// An authenticated subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
}

/// Validates the session credential carried by a request.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Returns the session when the request carries a valid credential.
    async fn verify(&self, headers: &HeaderMap) -> Option<Session>;
}

/// Verifies HMAC-SHA256 signed session cookies.
pub struct SignedCookieVerifier {
    secret: Vec<u8>,
    cookie_name: String,
    clock: Arc<dyn Clock>,
}

impl SignedCookieVerifier {
    pub fn new(secret: impl Into<Vec<u8>>, cookie_name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: cookie_name.into(),
            clock,
        }
    }

    pub fn from_config(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.secret.as_bytes(), config.cookie_name.clone(), clock)
    }

    /// Check a raw token value.
    pub fn verify_token(&self, token: &str) -> Option<Session> {
        if self.secret.is_empty() {
            return None;
        }

        let mut parts = token.rsplitn(3, '.');
        let signature = parts.next()?;
        let expires = parts.next()?;
        let subject = parts.next()?;
        if subject.is_empty() {
            return None;
        }

        let signature = hex::decode(signature).ok()?;
        let mut mac = HmacSha256::new_from_slice(&self.secret).ok()?;
        mac.update(subject.as_bytes());
        mac.update(b".");
        mac.update(expires.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let expires: u64 = expires.parse().ok()?;
        let now_secs = self.clock.now_ms() / 1_000;
        if expires <= now_secs {
            tracing::debug!(subject, expires, "Session token expired");
            return None;
        }

        Some(Session {
            subject: subject.to_string(),
        })
    }
}

#[async_trait]
impl SessionVerifier for SignedCookieVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Option<Session> {
        let token = find_cookie(headers, &self.cookie_name)?;
        self.verify_token(token)
    }
}

/// Find a cookie value by name across all `Cookie` headers.
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
