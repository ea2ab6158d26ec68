//! Home-lab dashboard gate.
//!
//! Serves the dashboard front-end and its status API behind a request gate.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ timeout ─▶ gate ─┬─▶ /api/services ─▶ Argo CD
//!                                                            │
//!                                                            └─▶ static front-end
//!
//!     gate: path class → session → trust → backoff → sliding window → headers
//! ```
//!
//! The gate keys throttling on X-Forwarded-For. Run this behind a reverse
//! proxy that overwrites that header.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use homelab_gate::config::load_config;
use homelab_gate::http::HttpServer;
use homelab_gate::lifecycle::{signals, Shutdown};
use homelab_gate::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "homelab-gate")]
#[command(about = "Authenticating, rate-limited front door for the home-lab dashboard")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "GATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("homelab-gate v{} starting", env!("CARGO_PKG_VERSION"));

    if config.auth.secret.is_empty() {
        tracing::warn!("No session secret configured; every request will be treated as unauthenticated");
    }

    tracing::info!(
        bind_address = %config.server.bind_address,
        static_dir = %config.server.static_dir,
        trusted_ips = config.trust.trusted_ips.len(),
        home_prefix = %config.trust.home_prefix,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    tokio::spawn(signals::trigger_on_signal(shutdown.clone()));

    server.run(listener, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
