//! Request path classification.
//!
//! # Responsibilities
//! - Recognize static assets (known prefixes or asset file extensions)
//! - Recognize public paths (reachable without a session)
//! - Treat everything else as protected
//!
//! # Design Decisions
//! - Static wins over public, public wins over protected
//! - Prefix matching is case-sensitive, extension matching is not
//! - No regex to guarantee O(n) matching

/// Default prefixes served without any gating.
pub const DEFAULT_STATIC_PREFIXES: &[&str] = &[
    "/_next",
    "/assets",
    "/favicon.ico",
    "/robots.txt",
    "/sitemap.xml",
];

/// File extensions treated as static assets.
pub const STATIC_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "svg", "ico", "css", "js", "map", "txt", "woff", "woff2",
    "ttf", "otf",
];

/// Outcome of classifying a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Served untouched: no session check, no throttling, no headers.
    Static,
    /// Login-equivalent path, reachable without a session.
    Public,
    /// Requires a valid session.
    Protected,
}

impl PathClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathClass::Static => "static",
            PathClass::Public => "public",
            PathClass::Protected => "protected",
        }
    }
}

/// Pure path classifier built from configuration.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    static_prefixes: Vec<String>,
    public_prefixes: Vec<String>,
}

impl PathClassifier {
    pub fn new<S, P>(static_prefixes: S, public_prefixes: P) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            static_prefixes: static_prefixes.into_iter().map(Into::into).collect(),
            public_prefixes: public_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn classify(&self, path: &str) -> PathClass {
        if self.is_static(path) {
            PathClass::Static
        } else if self.is_public(path) {
            PathClass::Public
        } else {
            PathClass::Protected
        }
    }

    pub fn is_static(&self, path: &str) -> bool {
        has_static_extension(path)
            || self
                .static_prefixes
                .iter()
                .any(|p| path.starts_with(p.as_str()))
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|p| path.starts_with(p.as_str()))
    }
}

impl Default for PathClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_STATIC_PREFIXES.iter().copied(), ["/login"])
    }
}

fn has_static_extension(path: &str) -> bool {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => STATIC_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
