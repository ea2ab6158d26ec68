//! Status data types: the upstream view and the dashboard view.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while fetching application status.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("ARGOCD_SERVER or ARGOCD_TOKEN missing")]
    NotConfigured,

    #[error("Argo CD request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Argo CD returned {0}")]
    Upstream(reqwest::StatusCode),
}

pub type StatusResult<T> = Result<T, StatusError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unknown,
}

impl HealthStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "healthy" => HealthStatus::Healthy,
            "degraded" => HealthStatus::Degraded,
            _ => HealthStatus::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncStatus {
    Synced,
    OutOfSync,
    Unknown,
}

impl SyncStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "synced" => SyncStatus::Synced,
            "outofsync" => SyncStatus::OutOfSync,
            _ => SyncStatus::Unknown,
        }
    }
}

/// One application as reported by the GitOps controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub health: HealthStatus,
    pub sync: SyncStatus,
}

/// Ready-to-render status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub icon: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}

impl From<HealthStatus> for StatusBadge {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Healthy => badge("Check", "bg-green-500", "Healthy"),
            HealthStatus::Degraded => badge("X", "bg-red-500", "Degraded"),
            HealthStatus::Unknown => badge("AlertTriangle", "bg-yellow-500", "Unknown"),
        }
    }
}

impl From<SyncStatus> for StatusBadge {
    fn from(status: SyncStatus) -> Self {
        match status {
            SyncStatus::Synced => badge("RefreshCcw", "bg-blue-500", "Synced"),
            SyncStatus::OutOfSync => badge("RefreshCcw", "bg-red-800", "Out of Sync"),
            SyncStatus::Unknown => badge("HelpCircle", "bg-gray-500", "Unknown"),
        }
    }
}

fn badge(icon: &'static str, color: &'static str, label: &'static str) -> StatusBadge {
    StatusBadge { icon, color, label }
}

/// One card on the dashboard grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCard {
    pub name: String,
    pub icon: &'static str,
    pub description: &'static str,
    pub href: String,
    pub health: StatusBadge,
    pub sync: StatusBadge,
}

/// Body of `GET /api/services`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub services: Vec<ServiceCard>,
    pub token_expiry: String,
}
