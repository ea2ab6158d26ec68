//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): gate outcomes by `outcome`
//! - `gate_strikes_total` (counter): backoff strikes registered
//! - `gate_tracked_identities` (gauge): ledger sizes by `ledger`
//! - `status_fetch_total` (counter): upstream status fetches by `result`
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are static strings; client identities are never labels

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(outcome: &'static str) {
    counter!("gate_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_strike() {
    counter!("gate_strikes_total").increment(1);
}

pub fn record_tracked_identities(ledger: &'static str, count: usize) {
    gauge!("gate_tracked_identities", "ledger" => ledger).set(count as f64);
}

pub fn record_status_fetch(result: &'static str) {
    counter!("status_fetch_total", "result" => result).increment(1);
}
