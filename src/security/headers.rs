//! Security response headers.
//!
//! The same fixed set is stamped on every gated response, whatever the
//! outcome. Static assets are the only exemption.

use axum::http::{
    header::{CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
    HeaderMap, HeaderName, HeaderValue,
};

pub const FRAME_OPTIONS: &str = "DENY";
pub const CONTENT_TYPE_OPTIONS: &str = "nosniff";
pub const REFERRER: &str = "strict-origin-when-cross-origin";
pub const CONTENT_SECURITY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' 'unsafe-eval'; \
style-src 'self' 'unsafe-inline'; \
img-src 'self' data: blob: https://lh3.googleusercontent.com; \
font-src 'self' data:;";

/// The full header set, in the order it is applied.
pub fn security_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (X_FRAME_OPTIONS, HeaderValue::from_static(FRAME_OPTIONS)),
        (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static(CONTENT_TYPE_OPTIONS)),
        (REFERRER_POLICY, HeaderValue::from_static(REFERRER)),
        (CONTENT_SECURITY_POLICY, HeaderValue::from_static(CONTENT_SECURITY)),
    ]
}

/// Insert (overwriting) the security headers into `headers`.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in security_headers() {
        headers.insert(name, value);
    }
}
