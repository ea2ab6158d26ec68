//! Client identity extraction.
//!
//! The identity is the first address in `X-Forwarded-For`. It is supplied by
//! the client and therefore spoofable unless a reverse proxy in front of us
//! overwrites the header.

use axum::http::HeaderMap;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Shared bucket for requests without a usable forwarded address.
pub const UNKNOWN_CLIENT: &str = "unknown";

pub fn client_identity(headers: &HeaderMap) -> String {
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}
