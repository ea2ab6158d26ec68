//! Argo CD REST client.
//!
//! # Responsibilities
//! - List applications via `GET /api/v1/applications`
//! - Reduce each application to name, health and sync status
//!
//! # Design Decisions
//! - Self-signed certificates are accepted (home-lab deployments)
//! - Missing fields degrade to "unknown" instead of failing the whole list

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ArgoCdConfig;
use crate::status::types::{Application, HealthStatus, StatusError, StatusResult, SyncStatus};

/// Anything that can list applications with their health and sync state.
#[async_trait]
pub trait ApplicationSource: Send + Sync {
    async fn applications(&self) -> StatusResult<Vec<Application>>;
}

#[derive(Debug, Default, Deserialize)]
struct ApplicationList {
    #[serde(default)]
    items: Option<Vec<ArgoApplication>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArgoApplication {
    metadata: Metadata,
    status: AppStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Metadata {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppStatus {
    health: StatusField,
    sync: StatusField,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatusField {
    status: Option<String>,
}

impl From<ArgoApplication> for Application {
    fn from(app: ArgoApplication) -> Self {
        Application {
            name: app.metadata.name.unwrap_or_else(|| "unknown".to_string()),
            health: HealthStatus::parse(app.status.health.status.as_deref().unwrap_or("unknown")),
            sync: SyncStatus::parse(app.status.sync.status.as_deref().unwrap_or("unknown")),
        }
    }
}

/// Client for a single Argo CD server.
pub struct ArgoCdClient {
    client: reqwest::Client,
    server: String,
    token: String,
}

impl ArgoCdClient {
    pub fn new(config: &ArgoCdConfig) -> StatusResult<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            server: config.server.trim().trim_end_matches('/').to_string(),
            token: config.token.trim().to_string(),
        })
    }

    fn applications_url(&self) -> String {
        format!("{}/api/v1/applications", self.server)
    }
}

#[async_trait]
impl ApplicationSource for ArgoCdClient {
    async fn applications(&self) -> StatusResult<Vec<Application>> {
        if self.server.is_empty() || self.token.is_empty() {
            return Err(StatusError::NotConfigured);
        }

        let response = self
            .client
            .get(self.applications_url())
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusError::Upstream(status));
        }

        let list: ApplicationList = response.json().await?;
        let apps: Vec<Application> = list
            .items
            .unwrap_or_default()
            .into_iter()
            .map(Application::from)
            .collect();

        tracing::debug!(count = apps.len(), "Fetched applications from Argo CD");
        Ok(apps)
    }
}
