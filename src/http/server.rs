//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the status API and the static front-end
//! - Wire up middleware (gate, timeout, request ID, tracing)
//! - Start the ledger janitor
//! - Serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::session::{SessionVerifier, SignedCookieVerifier};
use crate::config::GateConfig;
use crate::http::middleware::{gate_middleware, Gate};
use crate::http::services::list_services;
use crate::lifecycle::Shutdown;
use crate::security::{
    BackoffController, Clock, LedgerJanitor, SlidingWindowLimiter, SystemClock,
};
use crate::status::{ApplicationSource, ArgoCdClient, Catalogue, StatusError, StatusService};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub status: Arc<StatusService>,
}

/// Shared services the server is assembled from.
pub struct Components {
    pub clock: Arc<dyn Clock>,
    pub verifier: Arc<dyn SessionVerifier>,
    pub source: Arc<dyn ApplicationSource>,
    pub limiter: Arc<SlidingWindowLimiter>,
    pub backoff: Arc<BackoffController>,
}

impl Components {
    /// Production wiring: wall clock, signed cookies, Argo CD.
    pub fn from_config(config: &GateConfig) -> Result<Self, StatusError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Ok(Self {
            verifier: Arc::new(SignedCookieVerifier::from_config(&config.auth, clock.clone())),
            source: Arc::new(ArgoCdClient::new(&config.argocd)?),
            limiter: Arc::new(SlidingWindowLimiter::new()),
            backoff: Arc::new(BackoffController::new()),
            clock,
        })
    }
}

/// HTTP server for the dashboard.
pub struct HttpServer {
    router: Router,
    config: GateConfig,
    janitor: Option<LedgerJanitor>,
}

impl HttpServer {
    /// Create a server with production components.
    pub fn new(config: GateConfig) -> Result<Self, StatusError> {
        let components = Components::from_config(&config)?;
        Ok(Self::with_components(config, components))
    }

    /// Create a server around caller-supplied components.
    pub fn with_components(config: GateConfig, components: Components) -> Self {
        let router = build_router(&config, &components);

        let interval = config.throttle.sweep_interval_secs;
        let janitor = (interval > 0).then(|| {
            LedgerJanitor::new(
                components.limiter.clone(),
                components.backoff.clone(),
                components.clock.clone(),
                Duration::from_secs(interval),
            )
        });

        Self {
            router,
            config,
            janitor,
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener, shutdown: &Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if let Some(janitor) = self.janitor {
            tokio::spawn(janitor.run(shutdown.subscribe()));
        }

        let mut stop = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The assembled router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &GateConfig, components: &Components) -> Router {
    let gate = Arc::new(Gate::from_config(
        config,
        components.verifier.clone(),
        components.limiter.clone(),
        components.backoff.clone(),
        components.clock.clone(),
    ));

    let status = StatusService::new(
        components.source.clone(),
        Catalogue::new(config.argocd.base_url.clone()),
        components.clock.clone(),
    );
    let state = AppState {
        status: Arc::new(status),
    };

    Router::new()
        .route("/api/services", get(list_services))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate, gate_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
