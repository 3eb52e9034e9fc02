//! Bundle Source Registry
//!
//! Bundle sources register themselves with the URL schemes they serve. The
//! composition root resolves one source per scheme.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use swidget_domain::ports::BundleSource;

/// Configuration for bundle source creation
///
/// Sources use what they need and ignore the rest.
#[derive(Debug, Clone, Default)]
pub struct BundleSourceConfig {
    /// Source name (e.g., "http", "file")
    pub provider: String,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// User agent sent with remote requests
    pub user_agent: Option<String>,
    /// Base directory for relative file URLs
    pub root_dir: Option<PathBuf>,
    /// Largest accepted body in bytes
    pub max_bytes: Option<usize>,
    /// Additional source-specific configuration
    pub extra: HashMap<String, String>,
}

impl BundleSourceConfig {
    /// Create a new config with the given source name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the base directory
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    /// Set the body size limit
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Add extra configuration
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Registry entry for bundle sources
pub struct BundleSourceEntry {
    /// Unique source name (e.g., "http", "file")
    pub name: &'static str,
    /// URL schemes served by this source
    pub schemes: &'static [&'static str],
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create the source
    pub factory: fn(&BundleSourceConfig) -> Result<Arc<dyn BundleSource>, String>,
}

// Auto-collection via linkme distributed slices - sources submit entries at compile time
#[linkme::distributed_slice]
pub static BUNDLE_SOURCES: [BundleSourceEntry] = [..];

/// Resolve a bundle source by name
pub fn resolve_bundle_source(config: &BundleSourceConfig) -> Result<Arc<dyn BundleSource>, String> {
    let name = &config.provider;

    for entry in BUNDLE_SOURCES {
        if entry.name == name {
            return (entry.factory)(config);
        }
    }

    let available: Vec<&str> = BUNDLE_SOURCES.iter().map(|e| e.name).collect();

    Err(format!(
        "Unknown bundle source '{}'. Available sources: {:?}",
        name, available
    ))
}

/// Resolve the bundle source serving the scheme of `url`
///
/// URLs without a scheme are treated as `file`.
pub fn resolve_bundle_source_for_url(
    url: &str,
    config: &BundleSourceConfig,
) -> Result<Arc<dyn BundleSource>, String> {
    let scheme = url_scheme(url).unwrap_or("file");

    for entry in BUNDLE_SOURCES {
        if entry.schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
            let config = BundleSourceConfig {
                provider: entry.name.to_string(),
                ..config.clone()
            };
            return (entry.factory)(&config);
        }
    }

    Err(format!("No bundle source serves the '{scheme}' scheme"))
}

/// Scheme of a URL (`https` in `https://cdn/app.json`)
pub fn url_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    let valid = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// List all registered bundle sources as `(name, description)` pairs
pub fn list_bundle_sources() -> Vec<(&'static str, &'static str)> {
    BUNDLE_SOURCES
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
