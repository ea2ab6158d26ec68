//! Application status subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/services
//!     → argocd.rs (list applications from the GitOps controller)
//!     → catalogue.rs (icon, description, link per service)
//!     → types.rs (health / sync badges)
//!     → StatusSnapshot (JSON)
//! ```
//!
//! `/api/services` sits behind the request gate like any page: it needs a
//! session and takes a slot in the caller's rate window, so a dashboard load
//! that also polls the API costs two slots. Adding `/api` to
//! `auth.static_prefixes` serves it ungated and uncounted instead.

pub mod argocd;
pub mod catalogue;
pub mod types;

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::security::clock::Clock;

pub use argocd::{ApplicationSource, ArgoCdClient};
pub use catalogue::Catalogue;
pub use types::{
    Application, HealthStatus, ServiceCard, StatusBadge, StatusError, StatusSnapshot, SyncStatus,
};

/// Lifetime reported for the upstream API token.
pub const TOKEN_EXPIRY_DAYS: i64 = 180;

/// Builds dashboard snapshots from an application source.
pub struct StatusService {
    source: Arc<dyn ApplicationSource>,
    catalogue: Catalogue,
    clock: Arc<dyn Clock>,
}

impl StatusService {
    pub fn new(source: Arc<dyn ApplicationSource>, catalogue: Catalogue, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            catalogue,
            clock,
        }
    }

    pub async fn snapshot(&self) -> Result<StatusSnapshot, StatusError> {
        let apps = self.source.applications().await?;
        let services = apps.iter().map(|app| self.card(app)).collect();

        Ok(StatusSnapshot {
            services,
            token_expiry: self.token_expiry(),
        })
    }

    pub fn card(&self, app: &Application) -> ServiceCard {
        let info = self.catalogue.lookup(&app.name);
        ServiceCard {
            name: catalogue::display_name(&app.name),
            icon: info.icon,
            description: info.description,
            href: self.catalogue.href(&info),
            health: app.health.into(),
            sync: app.sync.into(),
        }
    }

    fn token_expiry(&self) -> String {
        let issued = DateTime::<Utc>::from_timestamp_millis(self.clock.now_ms() as i64)
            .unwrap_or_else(Utc::now);
        (issued + Duration::days(TOKEN_EXPIRY_DAYS)).to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
