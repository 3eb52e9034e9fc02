//! Swidget loader
//!
//! Orchestrates a mount: module cache lookup, a fresh child container per
//! instance, entry-point instantiation behind a panic boundary, and rendering
//! into an isolated mount point. Context props are subscribed so that
//! updates re-render the instance synchronously.

use super::module_cache::{ModuleCache, ModuleLease};
use super::mount_registry::{MountPointId, MountRegistry};
use serde_json::Value;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use swidget_domain::constants::DEFAULT_ROUTE_PATH;
use swidget_domain::context::Subscription;
use swidget_domain::di::DiContainer;
use swidget_domain::error::{Error, LoadFailure, LoadFailureKind, Result};
use swidget_domain::ports::{Component, EntryArgs, EvaluatedModule, RenderScope};
use swidget_domain::value_objects::{ModuleKey, Node, Props, SwidgetMetadata, service_ids};
use tracing::{debug, info, warn};

/// What the host asks the loader to mount
#[derive(Debug, Clone)]
pub struct MountDirective {
    /// Bundle location
    pub url: String,
    /// Logical module name
    pub name: String,
    /// Instance discriminator
    pub unique_id: String,
    /// Props handed verbatim to the entry point
    pub props: Props,
    /// Re-attempt a cached failed load
    pub retry: bool,
    /// Rendered into the region when the mount fails
    pub fallback: Option<Node>,
    /// Initial route path
    pub path: Option<String>,
}

impl MountDirective {
    /// Directive without props
    pub fn new<U, N, I>(url: U, name: N, unique_id: I) -> Self
    where
        U: Into<String>,
        N: Into<String>,
        I: Into<String>,
    {
        Self {
            url: url.into(),
            name: name.into(),
            unique_id: unique_id.into(),
            props: Props::new(),
            retry: false,
            fallback: None,
            path: None,
        }
    }

    /// Set the props
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Request a retry of a cached failure
    pub fn with_retry(mut self) -> Self {
        self.retry = true;
        self
    }

    /// Set the fallback node
    pub fn with_fallback(mut self, fallback: Node) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Set the initial route path
    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Module cache key
    pub fn key(&self) -> ModuleKey {
        ModuleKey::new(self.name.clone(), self.unique_id.clone())
    }
}

struct SwidgetInstance {
    id: MountPointId,
    key: ModuleKey,
    region: String,
    component: Box<dyn Component>,
    container: DiContainer,
    props: Props,
    config: Value,
    path: RwLock<String>,
    mounts: MountRegistry,
    renders: AtomicU64,
}

impl SwidgetInstance {
    fn render(&self) -> Result<()> {
        let path = self
            .path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let scope = RenderScope {
            container: &self.container,
            props: &self.props,
            config: &self.config,
            path: &path,
        };
        let node = catch_unwind(AssertUnwindSafe(|| self.component.render(&scope)))
            .map_err(|_| Error::internal(format!("swidget {} panicked while rendering", self.key)))??;
        self.mounts.render(&self.region, self.id, node)?;
        let renders = self.renders.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(module = %self.key, instance = %self.id, renders, "Rendered swidget");
        Ok(())
    }
}

/// A live swidget instance
///
/// Dropping it without [`SwidgetLoader::unmount`] still releases the mount
/// point, the context subscriptions and the module reference.
pub struct MountedSwidget {
    instance: Arc<SwidgetInstance>,
    subscriptions: Vec<Subscription>,
    lease: ModuleLease,
}

impl MountedSwidget {
    /// Mount point identity
    pub fn id(&self) -> MountPointId {
        self.instance.id
    }

    /// Module cache key
    pub fn key(&self) -> &ModuleKey {
        &self.instance.key
    }

    /// Region the instance is mounted in
    pub fn region(&self) -> &str {
        &self.instance.region
    }

    /// The instance's child container
    pub fn container(&self) -> &DiContainer {
        &self.instance.container
    }

    /// The cached module this instance was created from
    pub fn module(&self) -> &Arc<EvaluatedModule> {
        self.lease.module()
    }

    /// Current route path
    pub fn path(&self) -> String {
        self.instance
            .path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of completed renders
    pub fn render_count(&self) -> u64 {
        self.instance.renders.load(Ordering::Relaxed)
    }

    /// Last rendered output
    pub fn node(&self) -> Option<Node> {
        self.instance.mounts.node(&self.instance.region, self.instance.id)
    }

    /// Text of the last rendered output
    pub fn text(&self) -> String {
        self.node().map(|node| node.text_content()).unwrap_or_default()
    }
}

impl Drop for MountedSwidget {
    fn drop(&mut self) {
        self.subscriptions.clear();
        self.instance
            .mounts
            .detach(&self.instance.region, self.instance.id);
    }
}

impl fmt::Debug for MountedSwidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedSwidget")
            .field("id", &self.instance.id)
            .field("key", &self.instance.key)
            .field("region", &self.instance.region)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

/// Mounts and unmounts swidgets into host regions
#[derive(Clone)]
pub struct SwidgetLoader {
    cache: ModuleCache,
    host: DiContainer,
    mounts: MountRegistry,
    default_path: String,
}

impl SwidgetLoader {
    /// Loader resolving shared services through `host`
    pub fn new(cache: ModuleCache, host: DiContainer, mounts: MountRegistry) -> Self {
        Self {
            cache,
            host,
            mounts,
            default_path: DEFAULT_ROUTE_PATH.to_string(),
        }
    }

    /// Route path used when a directive does not set one
    pub fn with_default_path<S: Into<String>>(mut self, path: S) -> Self {
        self.default_path = path.into();
        self
    }

    /// Module cache
    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Host container every instance container is chained to
    pub fn host_container(&self) -> &DiContainer {
        &self.host
    }

    /// Host regions
    pub fn mounts(&self) -> &MountRegistry {
        &self.mounts
    }

    /// Mount a swidget into `region`
    ///
    /// On failure the directive's fallback, if any, is shown in the region and
    /// the error is returned.
    pub async fn mount(&self, region: &str, directive: MountDirective) -> Result<MountedSwidget> {
        let key = directive.key();
        let fallback = directive.fallback.clone();
        match self.try_mount(region, directive).await {
            Ok(mounted) => {
                self.mounts.clear_fallback(region, &key);
                Ok(mounted)
            }
            Err(error) => {
                warn!(module = %key.name, unique_id = %key.unique_id, region, error = %error, "Mount failed");
                if let Some(fallback) = fallback {
                    if let Err(e) = self.mounts.show_fallback(region, &key, fallback) {
                        debug!(region, error = %e, "Fallback not shown");
                    }
                }
                Err(error)
            }
        }
    }

    async fn try_mount(&self, region: &str, directive: MountDirective) -> Result<MountedSwidget> {
        if !self.mounts.has_region(region) {
            return Err(Error::mount_target_unavailable(region));
        }
        let key = directive.key();
        let lease = self
            .cache
            .acquire(&key, &directive.url, directive.retry)
            .await?;
        // The region may have gone away while the fetch was in flight.
        if !self.mounts.has_region(region) {
            return Err(Error::mount_target_unavailable(region));
        }

        let module = Arc::clone(lease.module());
        let config = module.manifest.config.clone();
        let container = self.host.create_child();
        container.bind_constant(service_ids::CONFIG, config.clone())?;
        container.bind_constant(service_ids::MODULE_NAME, module.manifest.name.clone())?;

        let args = EntryArgs {
            container: container.clone(),
            props: directive.props.clone(),
            config: config.clone(),
        };
        let component = catch_unwind(AssertUnwindSafe(|| module.entry.instantiate(args)))
            .map_err(|_| {
                Error::RemoteLoad(
                    LoadFailure::new(
                        LoadFailureKind::ContractViolation,
                        &directive.url,
                        "entry point panicked during instantiation",
                    )
                    .with_key(key.clone()),
                )
            })??;

        let instance = Arc::new(SwidgetInstance {
            id: MountPointId::new(),
            key: key.clone(),
            region: region.to_string(),
            component,
            container,
            props: directive.props,
            config,
            path: RwLock::new(directive.path.unwrap_or_else(|| self.default_path.clone())),
            mounts: self.mounts.clone(),
            renders: AtomicU64::new(0),
        });

        self.mounts.attach(region, instance.id)?;
        if let Err(error) = instance.render() {
            self.mounts.detach(region, instance.id);
            return Err(error);
        }

        let subscriptions = instance
            .props
            .contexts()
            .map(|(prop, context)| {
                let weak: Weak<SwidgetInstance> = Arc::downgrade(&instance);
                let prop = prop.to_string();
                context.subscribe(move |snapshot| {
                    let Some(instance) = weak.upgrade() else {
                        return;
                    };
                    if let Err(e) = instance.render() {
                        warn!(
                            module = %instance.key,
                            instance = %instance.id,
                            prop = %prop,
                            version = snapshot.version(),
                            error = %e,
                            "Re-render after context update failed"
                        );
                    }
                })
            })
            .collect();

        info!(
            module = %key.name,
            unique_id = %key.unique_id,
            region,
            instance = %instance.id,
            "Mounted swidget"
        );
        Ok(MountedSwidget {
            instance,
            subscriptions,
            lease,
        })
    }

    /// Tear down an instance and release its module reference
    pub fn unmount(&self, mounted: MountedSwidget) {
        info!(
            module = %mounted.instance.key.name,
            unique_id = %mounted.instance.key.unique_id,
            instance = %mounted.instance.id,
            "Unmounted swidget"
        );
        drop(mounted);
    }

    /// Render an instance again
    pub fn rerender(&self, mounted: &MountedSwidget) -> Result<()> {
        mounted.instance.render()
    }

    /// Change an instance's route path and re-render it
    pub fn navigate<S: Into<String>>(&self, mounted: &MountedSwidget, path: S) -> Result<()> {
        let path = path.into();
        debug!(module = %mounted.instance.key, path = %path, "Navigating");
        *mounted
            .instance
            .path
            .write()
            .unwrap_or_else(PoisonError::into_inner) = path;
        mounted.instance.render()
    }

    /// Metadata of a cached module
    pub fn metadata(&self, key: &ModuleKey) -> Option<SwidgetMetadata> {
        self.cache.module(key).and_then(|module| module.metadata())
    }
}

impl fmt::Debug for SwidgetLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwidgetLoader")
            .field("cache", &self.cache)
            .field("mounts", &self.mounts)
            .field("default_path", &self.default_path)
            .finish()
    }
}
