//! Host composition root
//!
//! Wires configuration, bundle sources, the module cache and the loader
//! into a ready-to-use [`HostRuntime`].

use crate::config::AppConfig;
use crate::source_router::SchemeRouterSource;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use swidget_application::domain_services::{EntryCatalog, ManifestEvaluator};
use swidget_application::ports::registry::BundleSourceConfig;
use swidget_application::use_cases::{ModuleCache, MountRegistry, SwidgetLoader};
use swidget_domain::di::{ContainerOptions, DiContainer};
use swidget_domain::error::Result;
use swidget_domain::ports::BundleSource;
use swidget_domain::value_objects::service_ids;
use tracing::info;

/// Everything a host needs to mount swidgets
pub struct HostRuntime {
    config: AppConfig,
    container: DiContainer,
    catalog: Arc<EntryCatalog>,
    loader: SwidgetLoader,
}

impl HostRuntime {
    /// Effective configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Host container; every swidget container is chained to it
    pub fn container(&self) -> &DiContainer {
        &self.container
    }

    /// Entry points bundles may name
    pub fn catalog(&self) -> &Arc<EntryCatalog> {
        &self.catalog
    }

    /// The loader
    pub fn loader(&self) -> &SwidgetLoader {
        &self.loader
    }

    /// Host regions
    pub fn mounts(&self) -> &MountRegistry {
        self.loader.mounts()
    }

    /// Module cache
    pub fn cache(&self) -> &ModuleCache {
        self.loader.cache()
    }
}

impl fmt::Debug for HostRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRuntime")
            .field("host", &self.config.host.name)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

/// Builder for [`HostRuntime`]
pub struct HostBuilder {
    config: AppConfig,
    sources: Vec<(String, Arc<dyn BundleSource>)>,
    catalog: Option<Arc<EntryCatalog>>,
    container: Option<DiContainer>,
}

impl HostBuilder {
    /// Builder for `config`
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            catalog: None,
            container: None,
        }
    }

    /// Serve `scheme` with `source` instead of the registered source
    pub fn with_source<S: Into<String>>(mut self, scheme: S, source: Arc<dyn BundleSource>) -> Self {
        self.sources.push((scheme.into(), source));
        self
    }

    /// Use `catalog` for entry lookups
    pub fn with_catalog(mut self, catalog: Arc<EntryCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use an existing host container
    pub fn with_container(mut self, container: DiContainer) -> Self {
        self.container = Some(container);
        self
    }

    /// Wire the runtime
    pub fn build(self) -> Result<HostRuntime> {
        let config = self.config;
        let container = self.container.unwrap_or_else(|| {
            DiContainer::with_options(ContainerOptions {
                strict: config.loader.strict_bindings,
            })
        });
        let catalog = self.catalog.unwrap_or_default();

        let mut source_config = BundleSourceConfig::new("router")
            .with_timeout_secs(config.http.timeout_secs)
            .with_user_agent(config.http.user_agent.clone())
            .with_max_bytes(config.loader.max_bundle_bytes);
        if let Some(root) = &config.loader.bundle_root {
            source_config = source_config.with_root_dir(root.clone());
        }
        let source = self
            .sources
            .into_iter()
            .fold(SchemeRouterSource::new(source_config), |router, (scheme, source)| {
                router.with_source(scheme, source)
            });

        let evaluator = ManifestEvaluator::new(Arc::clone(&catalog))
            .with_max_bundle_bytes(config.loader.max_bundle_bytes);
        let cache = ModuleCache::with_policy(
            Arc::new(source),
            Arc::new(evaluator),
            config.loader.eviction,
        );
        let loader = SwidgetLoader::new(cache, container.clone(), MountRegistry::new())
            .with_default_path(config.host.default_route.clone());

        let build_config: serde_json::Map<String, Value> = config
            .host
            .build_config
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if !container.is_bound_locally(&service_ids::APP_NAME) {
            container.bind_constant(service_ids::APP_NAME, config.host.name.clone())?;
        }
        if !container.is_bound_locally(&service_ids::CONFIG) {
            container.bind_constant(service_ids::CONFIG, Value::Object(build_config))?;
        }

        info!(
            host = %config.host.name,
            eviction = ?config.loader.eviction,
            strict = config.loader.strict_bindings,
            "Host runtime initialized"
        );
        Ok(HostRuntime {
            config,
            container,
            catalog,
            loader,
        })
    }
}

/// Build a host runtime from configuration with registry-resolved sources
pub fn init_host(config: AppConfig) -> Result<HostRuntime> {
    HostBuilder::new(config).build()
}
