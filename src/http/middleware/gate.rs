//! Request gate middleware.
//!
//! Runs in front of every request and picks one outcome:
//!
//! ```text
//! static asset            → pass through untouched (no headers)
//! public  + session       → redirect to "/"
//! public  + no session    → allow
//! protected + no session  → redirect to the login path
//! protected + session     → trusted?  → allow
//!                           cooling down? → 429 "Too many attempts. Try later."
//!                           window full?  → strike + 429 "Too many requests, ..."
//!                           otherwise     → allow
//! ```
//!
//! Every outcome except the static pass-through carries the security headers.
//! Session verification is the only await and it happens before any throttle
//! state is touched, so a cancelled request leaves the ledgers alone.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::identity::client_identity;
use crate::auth::session::SessionVerifier;
use crate::config::GateConfig;
use crate::observability::metrics;
use crate::routing::{PathClass, PathClassifier};
use crate::security::{
    apply_security_headers, BackoffController, Clock, SlidingWindowLimiter, TrustRegistry,
};

pub const BACKOFF_MESSAGE: &str = "Too many attempts. Try later.";
pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The identity is still serving a cooldown.
    Backoff,
    /// The identity just overflowed its rate window.
    RateLimited,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::Backoff => BACKOFF_MESSAGE,
            Rejection::RateLimited => RATE_LIMIT_MESSAGE,
        }
    }
}

/// Outcome of gating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Static asset: forward without touching the response.
    PassThrough,
    /// Forward and stamp security headers on the response.
    Allow,
    /// Temporary redirect to the given path.
    Redirect(String),
    /// 429 with a fixed message.
    Reject(Rejection),
}

impl Decision {
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::PassThrough => "static",
            Decision::Allow => "allow",
            Decision::Redirect(_) => "redirect",
            Decision::Reject(Rejection::Backoff) => "backoff",
            Decision::Reject(Rejection::RateLimited) => "rate_limited",
        }
    }
}

/// Everything the gate needs, built once at startup.
pub struct Gate {
    classifier: PathClassifier,
    verifier: Arc<dyn SessionVerifier>,
    trust: TrustRegistry,
    limiter: Arc<SlidingWindowLimiter>,
    backoff: Arc<BackoffController>,
    clock: Arc<dyn Clock>,
    login_path: String,
}

impl Gate {
    pub fn new(
        classifier: PathClassifier,
        verifier: Arc<dyn SessionVerifier>,
        trust: TrustRegistry,
        limiter: Arc<SlidingWindowLimiter>,
        backoff: Arc<BackoffController>,
        clock: Arc<dyn Clock>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            verifier,
            trust,
            limiter,
            backoff,
            clock,
            login_path: login_path.into(),
        }
    }

    /// Build a gate from configuration around the given collaborators.
    pub fn from_config(
        config: &GateConfig,
        verifier: Arc<dyn SessionVerifier>,
        limiter: Arc<SlidingWindowLimiter>,
        backoff: Arc<BackoffController>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let classifier = PathClassifier::new(
            config.auth.static_prefixes.iter().cloned(),
            config.auth.public_paths.iter().cloned(),
        );
        Self::new(
            classifier,
            verifier,
            TrustRegistry::from_config(&config.trust),
            limiter,
            backoff,
            clock,
            config.auth.login_path.clone(),
        )
    }

    /// Decide what to do with a request.
    pub async fn decide(&self, path: &str, headers: &HeaderMap) -> Decision {
        let class = self.classifier.classify(path);
        if class == PathClass::Static {
            return Decision::PassThrough;
        }

        let session = self.verifier.verify(headers).await;

        match (class, session) {
            (PathClass::Public, Some(_)) => Decision::Redirect("/".to_string()),
            (PathClass::Public, None) => Decision::Allow,
            (_, None) => {
                tracing::debug!(path, "No session, redirecting to login");
                Decision::Redirect(self.login_path.clone())
            }
            (_, Some(_)) => self.throttle(&client_identity(headers)),
        }
    }

    /// Apply trust, backoff and the rate window to an authenticated request.
    pub fn throttle(&self, identity: &str) -> Decision {
        if self.trust.is_trusted(identity) {
            return Decision::Allow;
        }

        let now = self.clock.now_ms();

        if !self.backoff.is_allowed(identity, now) {
            tracing::warn!(client = %identity, "Request refused during backoff cooldown");
            return Decision::Reject(Rejection::Backoff);
        }

        if !self.limiter.check(identity, now) {
            let entry = self.backoff.register_strike(identity, now);
            metrics::record_strike();
            tracing::warn!(
                client = %identity,
                strikes = entry.strikes,
                "Rate limit exceeded"
            );
            return Decision::Reject(Rejection::RateLimited);
        }

        Decision::Allow
    }
}

/// Axum middleware applying [`Gate::decide`] to each request.
pub async fn gate_middleware(
    State(gate): State<Arc<Gate>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let decision = gate.decide(parts.uri.path(), &parts.headers).await;
    let request = Request::from_parts(parts, body);

    metrics::record_decision(decision.outcome());

    let mut response = match decision {
        Decision::PassThrough => return next.run(request).await,
        Decision::Allow => next.run(request).await,
        Decision::Redirect(location) => Redirect::temporary(&location).into_response(),
        Decision::Reject(rejection) => {
            (StatusCode::TOO_MANY_REQUESTS, rejection.message()).into_response()
        }
    };

    apply_security_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::Session;
    use crate::security::{ManualClock, MAX_ATTEMPTS, MAX_REQUESTS_PER_WINDOW};
    use async_trait::async_trait;
    use axum::http::HeaderValue;

    /// Treats any request carrying an `authorization` header as signed in.
    struct HeaderVerifier;

    #[async_trait]
    impl SessionVerifier for HeaderVerifier {
        async fn verify(&self, headers: &HeaderMap) -> Option<Session> {
            headers.get("authorization").map(|_| Session {
                subject: "operator".into(),
            })
        }
    }

    struct Fixture {
        gate: Gate,
        clock: Arc<ManualClock>,
        limiter: Arc<SlidingWindowLimiter>,
        backoff: Arc<BackoffController>,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(1_000_000_000));
        let limiter = Arc::new(SlidingWindowLimiter::new());
        let backoff = Arc::new(BackoffController::new());
        let gate = Gate::new(
            PathClassifier::default(),
            Arc::new(HeaderVerifier),
            TrustRegistry::new(["127.0.0.1"], Some("192.168.0".into())),
            limiter.clone(),
            backoff.clone(),
            clock.clone(),
            "/login",
        );
        Fixture {
            gate,
            clock,
            limiter,
            backoff,
        }
    }

    fn request_headers(ip: Option<&'static str>, signed_in: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(ip) = ip {
            headers.insert("x-forwarded-for", HeaderValue::from_static(ip));
        }
        if signed_in {
            headers.insert("authorization", HeaderValue::from_static("yes"));
        }
        headers
    }

    #[tokio::test]
    async fn static_assets_skip_everything() {
        let f = fixture();
        let headers = request_headers(Some("1.2.3.4"), false);
        assert_eq!(f.gate.decide("/logo.png", &headers).await, Decision::PassThrough);
        assert_eq!(f.gate.decide("/logo.png", &headers).await, Decision::PassThrough);
        assert!(f.limiter.is_empty());
    }

    #[tokio::test]
    async fn login_page_rules() {
        let f = fixture();
        let anon = request_headers(Some("1.2.3.4"), false);
        let authed = request_headers(Some("1.2.3.4"), true);

        assert_eq!(f.gate.decide("/login", &anon).await, Decision::Allow);
        assert_eq!(f.gate.decide("/login", &authed).await, Decision::Redirect("/".into()));
        assert!(f.limiter.is_empty(), "public paths are never throttled");
    }

    #[tokio::test]
    async fn protected_without_session_redirects_to_login() {
        let f = fixture();
        let anon = request_headers(Some("1.2.3.4"), false);
        assert_eq!(f.gate.decide("/", &anon).await, Decision::Redirect("/login".into()));
        assert!(f.limiter.is_empty());
    }

    #[tokio::test]
    async fn hundred_and_first_request_is_limited() {
        let f = fixture();
        let headers = request_headers(Some("203.0.113.9"), true);

        for _ in 0..MAX_REQUESTS_PER_WINDOW {
            assert_eq!(f.gate.decide("/", &headers).await, Decision::Allow);
            f.clock.advance(5);
        }
        assert_eq!(
            f.gate.decide("/", &headers).await,
            Decision::Reject(Rejection::RateLimited)
        );
        assert_eq!(f.backoff.strikes("203.0.113.9"), 1);
    }

    #[test]
    fn backoff_blocks_before_window_is_consulted() {
        let f = fixture();
        let now = f.clock.now_ms();
        for _ in 0..MAX_ATTEMPTS {
            f.backoff.register_strike("198.51.100.1", now);
        }

        assert_eq!(f.gate.throttle("198.51.100.1"), Decision::Reject(Rejection::Backoff));
        assert_eq!(f.limiter.recorded("198.51.100.1"), 0, "no window slot consumed");

        f.clock.advance(25_000);
        assert_eq!(f.gate.throttle("198.51.100.1"), Decision::Allow);
        assert_eq!(f.backoff.strikes("198.51.100.1"), 0);
    }

    #[test]
    fn trusted_identities_bypass_throttling() {
        let f = fixture();
        let now = f.clock.now_ms();
        for _ in 0..MAX_ATTEMPTS * 2 {
            f.backoff.register_strike("192.168.0.50", now);
            f.backoff.register_strike("127.0.0.1", now);
        }

        for _ in 0..(MAX_REQUESTS_PER_WINDOW * 2) {
            assert_eq!(f.gate.throttle("192.168.0.50"), Decision::Allow);
            assert_eq!(f.gate.throttle("127.0.0.1"), Decision::Allow);
        }
        assert!(f.limiter.is_empty());
    }

    #[tokio::test]
    async fn missing_forwarded_header_shares_unknown_bucket() {
        let f = fixture();
        let headers = request_headers(None, true);
        assert_eq!(f.gate.decide("/", &headers).await, Decision::Allow);
        assert_eq!(f.limiter.recorded("unknown"), 1);
    }

    /// Verification that never finishes, like a stalled session backend.
    struct StalledVerifier;

    #[async_trait]
    impl SessionVerifier for StalledVerifier {
        async fn verify(&self, _headers: &HeaderMap) -> Option<Session> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn cancelled_request_leaves_ledgers_untouched() {
        let clock = Arc::new(ManualClock::new(1_000_000_000));
        let limiter = Arc::new(SlidingWindowLimiter::new());
        let backoff = Arc::new(BackoffController::new());
        let gate = Gate::new(
            PathClassifier::default(),
            Arc::new(StalledVerifier),
            TrustRegistry::new(Vec::<String>::new(), None),
            limiter.clone(),
            backoff.clone(),
            clock,
            "/login",
        );
        let headers = request_headers(Some("203.0.113.7"), true);

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            gate.decide("/", &headers),
        )
        .await;

        assert!(result.is_err(), "decision should still be pending");
        assert!(limiter.is_empty());
        assert!(backoff.is_empty());
    }

    #[test]
    fn outcomes_have_metric_labels() {
        assert_eq!(Decision::PassThrough.outcome(), "static");
        assert_eq!(Decision::Reject(Rejection::Backoff).outcome(), "backoff");
        assert_eq!(Rejection::RateLimited.message(), RATE_LIMIT_MESSAGE);
    }
}
