//! Known home-lab services and how to present them.

/// Display metadata for one catalogued service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceInfo {
    pub icon: &'static str,
    pub description: &'static str,
    /// Link relative to the home server base URL, a port suffix (":8123"),
    /// or an absolute URL.
    pub link: Option<&'static str>,
}

const FALLBACK: ServiceInfo = ServiceInfo {
    icon: "Server",
    description: "No description available.",
    link: None,
};

const fn info(icon: &'static str, description: &'static str, link: Option<&'static str>) -> ServiceInfo {
    ServiceInfo {
        icon,
        description,
        link,
    }
}

/// Lookup table keyed by normalized name.
const SERVICES: &[(&str, ServiceInfo)] = &[
    ("cloudflared", info("Cloud", "Secure tunnel for accessing services remotely.", None)),
    ("couchdb", info("Database", "NoSQL document database. Used for Obsidian", None)),
    ("fleetdm", info("Monitor", "Device management and security platform.", Some(":30808"))),
    ("homeassistant", info("Home", "Control smart devices and monitor sensors.", Some(":8123/lovelace/home"))),
    ("keycloak", info("UserCircle2", "Identity and access management for apps.", Some(":30910"))),
    ("mosquitto", info("Radio", "MQTT message broker for IoT devices.", None)),
    ("mysql", info("Database", "Relational SQL database. Used for FleetDM", None)),
    ("owncloud", info("Cloud", "Self-hosted file sharing and collaboration.", Some(":30080"))),
    ("postgres", info("Database", "Advanced relational SQL database.", None)),
    ("redis", info("DatabaseZap", "In-memory key-value data store. Caching option.", None)),
    ("vaultwarden", info("Lock", "Password manager server, Bitwarden compatible.", Some(":30182"))),
    ("wallos", info("Wallet", "Personal finance and subscription tracker.", Some(":30681"))),
    ("zigbee2mqtt", info("RadioTower", "Bridge Zigbee devices to MQTT for smart homes.", Some(":31592"))),
];

/// Lowercase and strip `-` / `_` so "Home-Assistant" finds "homeassistant".
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Service catalogue bound to a home server base URL.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    base_url: String,
}

impl Catalogue {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Metadata for `name`, or a generic fallback.
    pub fn lookup(&self, name: &str) -> ServiceInfo {
        let key = normalize_key(name);
        SERVICES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, info)| *info)
            .unwrap_or(FALLBACK)
    }

    /// Resolve a catalogue link against the base URL. Empty when there is
    /// no link.
    pub fn href(&self, info: &ServiceInfo) -> String {
        info.link.map(|link| self.with_base(link)).unwrap_or_default()
    }

    fn with_base(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        let base = self.base_url.trim().trim_end_matches('/');
        if base.is_empty() {
            return link.to_string();
        }
        // ":port" links name another service on the same host, so they join
        // onto the base directly instead of becoming a "/:port" path.
        if link.starts_with('/') || link.starts_with(':') {
            format!("{base}{link}")
        } else {
            format!("{base}/{link}")
        }
    }
}

/// Upper-case the first character.
pub fn display_name(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_key("Home-Assistant"), "homeassistant");
        assert_eq!(normalize_key("zigbee_2mqtt"), "zigbee2mqtt");
    }

    #[test]
    fn lookup_falls_back_for_unknown_services() {
        let catalogue = Catalogue::default();
        assert_eq!(catalogue.lookup("vaultwarden").icon, "Lock");
        assert_eq!(catalogue.lookup("Home_Assistant").icon, "Home");

        let unknown = catalogue.lookup("grafana");
        assert_eq!(unknown.icon, "Server");
        assert_eq!(unknown.description, "No description available.");
        assert_eq!(catalogue.href(&unknown), "");
    }

    #[test]
    fn links_join_onto_base_url() {
        let catalogue = Catalogue::new("http://192.168.0.10/");
        let ha = catalogue.lookup("homeassistant");
        assert_eq!(catalogue.href(&ha), "http://192.168.0.10:8123/lovelace/home");

        let absolute = info("X", "x", Some("https://cloud.example.com"));
        assert_eq!(catalogue.href(&absolute), "https://cloud.example.com");

        let relative = info("X", "x", Some("grafana"));
        assert_eq!(catalogue.href(&relative), "http://192.168.0.10/grafana");

        let rooted = info("X", "x", Some("/grafana"));
        assert_eq!(catalogue.href(&rooted), "http://192.168.0.10/grafana");
    }

    #[test]
    fn links_stay_relative_without_base() {
        let catalogue = Catalogue::new("");
        let fleet = catalogue.lookup("fleetdm");
        assert_eq!(catalogue.href(&fleet), ":30808");
    }

    #[test]
    fn capitalizes_first_letter() {
        assert_eq!(display_name("redis"), "Redis");
        assert_eq!(display_name("ünicode"), "Ünicode");
        assert_eq!(display_name(""), "");
    }
}
