//! Scheme-routed bundle source
//!
//! Dispatches each fetch to the source registered for the URL's scheme,
//! creating sources from the registry on first use.

use async_trait::async_trait;
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use swidget_application::ports::registry::{
    BundleSourceConfig, resolve_bundle_source_for_url, url_scheme,
};
use swidget_domain::error::{Error, LoadFailureKind, Result};
use swidget_domain::ports::BundleSource;
use swidget_domain::value_objects::Bundle;
use tracing::debug;

/// Scheme assumed for URLs without one
const DEFAULT_SCHEME: &str = "file";

/// [`BundleSource`] choosing a concrete source per URL scheme
pub struct SchemeRouterSource {
    config: BundleSourceConfig,
    sources: DashMap<String, Arc<dyn BundleSource>>,
}

impl SchemeRouterSource {
    /// Router creating sources with `config`
    pub fn new(config: BundleSourceConfig) -> Self {
        Self {
            config,
            sources: DashMap::new(),
        }
    }

    /// Serve `scheme` with `source` instead of the registry's
    pub fn with_source<S: Into<String>>(self, scheme: S, source: Arc<dyn BundleSource>) -> Self {
        self.sources.insert(scheme.into().to_ascii_lowercase(), source);
        self
    }

    /// Source serving `url`
    pub fn route(&self, url: &str) -> Result<Arc<dyn BundleSource>> {
        let scheme = url_scheme(url)
            .unwrap_or(DEFAULT_SCHEME)
            .to_ascii_lowercase();
        if let Some(source) = self.sources.get(&scheme) {
            return Ok(Arc::clone(source.value()));
        }
        let source = resolve_bundle_source_for_url(url, &self.config)
            .map_err(|message| Error::remote_load(LoadFailureKind::Network, url, message))?;
        debug!(scheme = %scheme, source = source.source_name(), "Resolved bundle source");
        let source = self
            .sources
            .entry(scheme)
            .or_insert(source)
            .value()
            .clone();
        Ok(source)
    }

    /// Schemes with a source already resolved
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self.sources.iter().map(|e| e.key().clone()).collect();
        schemes.sort();
        schemes
    }
}

#[async_trait]
impl BundleSource for SchemeRouterSource {
    fn source_name(&self) -> &str {
        "router"
    }

    async fn fetch(&self, url: &str) -> Result<Bundle> {
        let source = self.route(url)?;
        source.fetch(url).await
    }
}

impl fmt::Debug for SchemeRouterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeRouterSource")
            .field("schemes", &self.schemes())
            .finish()
    }
}
