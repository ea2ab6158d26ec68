//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use homelab_gate::auth::SignedCookieVerifier;
use homelab_gate::config::GateConfig;
use homelab_gate::http::{Components, HttpServer};
use homelab_gate::security::{BackoffController, ManualClock, SlidingWindowLimiter};
use homelab_gate::status::{
    Application, ApplicationSource, HealthStatus, StatusError, SyncStatus,
};

pub const SECRET: &str = "integration-secret";
/// 2026-01-01T00:00:00Z
pub const START_MS: u64 = 1_767_225_600_000;

/// Sign a session cookie value the way the identity provider does.
pub fn session_token(subject: &str, expires_secs: u64) -> String {
    let payload = format!("{subject}.{expires_secs}");
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
    mac.update(payload.as_bytes());
    format!("{payload}.{}", hex::encode(mac.finalize().into_bytes()))
}

pub fn valid_token() -> String {
    session_token("operator@home.lan", START_MS / 1_000 + 86_400)
}

/// Application source returning a fixed list, or failing.
pub struct StubSource {
    pub apps: Option<Vec<Application>>,
}

#[async_trait]
impl ApplicationSource for StubSource {
    async fn applications(&self) -> Result<Vec<Application>, StatusError> {
        self.apps.clone().ok_or(StatusError::NotConfigured)
    }
}

pub fn sample_apps() -> Vec<Application> {
    vec![
        Application {
            name: "homeassistant".into(),
            health: HealthStatus::Healthy,
            sync: SyncStatus::Synced,
        },
        Application {
            name: "redis".into(),
            health: HealthStatus::Degraded,
            sync: SyncStatus::OutOfSync,
        },
    ]
}

/// A fully wired server with a controllable clock.
pub struct Harness {
    pub server: HttpServer,
    pub clock: Arc<ManualClock>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub backoff: Arc<BackoffController>,
    pub static_dir: StaticDir,
}

impl Harness {
    pub fn router(&self) -> Router {
        self.server.router()
    }
}

/// Temporary front-end directory, removed on drop.
pub struct StaticDir {
    pub path: PathBuf,
}

impl StaticDir {
    fn create() -> Self {
        let path = std::env::temp_dir().join(format!("homelab-gate-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("index.html"), "<h1>dashboard</h1>").unwrap();
        std::fs::write(path.join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        Self { path }
    }
}

impl Drop for StaticDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

pub fn test_config(static_dir: &std::path::Path) -> GateConfig {
    let mut config = GateConfig::default();
    config.server.bind_address = "127.0.0.1:0".into();
    config.server.static_dir = static_dir.to_string_lossy().into_owned();
    config.auth.secret = SECRET.into();
    config.trust.trusted_ips = vec!["10.0.0.1".into()];
    config.trust.home_prefix = "192.168.0".into();
    config.argocd.base_url = "http://nas.lan".into();
    config.throttle.sweep_interval_secs = 0;
    config
}

pub fn harness_with(apps: Option<Vec<Application>>, tweak: impl FnOnce(&mut GateConfig)) -> Harness {
    let static_dir = StaticDir::create();

    let mut config = test_config(&static_dir.path);
    tweak(&mut config);

    let clock = Arc::new(ManualClock::new(START_MS));
    let limiter = Arc::new(SlidingWindowLimiter::new());
    let backoff = Arc::new(BackoffController::new());
    let components = Components {
        clock: clock.clone(),
        verifier: Arc::new(SignedCookieVerifier::new(SECRET, "session", clock.clone())),
        source: Arc::new(StubSource { apps }),
        limiter: limiter.clone(),
        backoff: backoff.clone(),
    };

    Harness {
        server: HttpServer::with_components(config, components),
        clock,
        limiter,
        backoff,
        static_dir,
    }
}

pub fn harness() -> Harness {
    harness_with(Some(sample_apps()), |_| {})
}

/// Build a GET request with optional client address and session.
pub fn get(path: &str, client: Option<&str>, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(client) = client {
        builder = builder.header("x-forwarded-for", client);
    }
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("session={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_security_headers(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
    assert!(headers["content-security-policy"]
        .to_str()
        .unwrap()
        .starts_with("default-src 'self';"));
}

pub fn assert_no_security_headers(response: &axum::response::Response) {
    let headers = response.headers();
    assert!(headers.get("x-frame-options").is_none());
    assert!(headers.get("content-security-policy").is_none());
}
