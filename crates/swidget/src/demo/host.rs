//! Host page of the demo
//!
//! Two toggles, each mounting the same swidget instance (`swidget#s1`) into
//! the host region with the host's shared context as the `myState` prop.
//! Both toggles share one cache record, so the bundle is fetched once.

use super::my_app::{CONTEXT_PROP, STAMP_FIELD, demo_manifest};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use swidget_application::{MountDirective, MountedSwidget, SwidgetLoader};
use swidget_domain::context::{ContextHandle, SharedContext};
use swidget_domain::error::Result;
use swidget_domain::value_objects::Props;
use swidget_infrastructure::config::AppConfig;
use swidget_infrastructure::constants::DEFAULT_MOUNT_REGION;
use swidget_infrastructure::{HostBuilder, HostRuntime};
use swidget_providers::MemoryBundleSource;
use tracing::info;

/// Where the demo serves its bundle
pub const DEMO_BUNDLE_URL: &str = "memory://localhost:7070/swidget.json";

/// Name the demo bundle exports
pub const DEMO_SWIDGET_NAME: &str = "swidget";

/// Instance identifier both toggles share
pub const DEMO_UNIQUE_ID: &str = "s1";

/// One of the two toggles on the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// First toggle
    First,
    /// Second toggle
    Second,
}

impl Toggle {
    fn slot(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// Host runtime serving the demo bundle from memory
pub fn demo_runtime(config: AppConfig) -> Result<(HostRuntime, Arc<MemoryBundleSource>)> {
    let source = Arc::new(MemoryBundleSource::new());
    source.insert_manifest(DEMO_BUNDLE_URL, &demo_manifest(DEMO_SWIDGET_NAME))?;
    let runtime = HostBuilder::new(config)
        .with_source("memory", Arc::clone(&source) as _)
        .build()?;
    runtime.mounts().create_region(DEFAULT_MOUNT_REGION);
    Ok((runtime, source))
}

/// The host page
pub struct HostHome {
    slots: [Option<MountedSwidget>; 2],
    loader: SwidgetLoader,
    region: String,
    context: SharedContext,
    renders: AtomicU64,
}

impl HostHome {
    /// Host page mounting into `region`
    pub fn new<S: Into<String>>(loader: SwidgetLoader, region: S) -> Self {
        Self {
            slots: [None, None],
            loader,
            region: region.into(),
            context: SharedContext::from_value(json!({ (STAMP_FIELD): "bar" })),
            renders: AtomicU64::new(0),
        }
    }

    /// Host page of a runtime, mounting into the default region
    pub fn for_runtime(runtime: &HostRuntime) -> Self {
        Self::new(runtime.loader().clone(), DEFAULT_MOUNT_REGION)
    }

    /// Handle to the host's shared context
    pub fn context(&self) -> ContextHandle {
        self.context.handle()
    }

    /// The swidget mounted by `toggle`, if shown
    pub fn mounted(&self, toggle: Toggle) -> Option<&MountedSwidget> {
        self.slots[toggle.slot()].as_ref()
    }

    /// Flip `toggle`; returns whether its swidget is now shown
    pub async fn toggle(&mut self, toggle: Toggle) -> Result<bool> {
        if let Some(mounted) = self.slots[toggle.slot()].take() {
            self.loader.unmount(mounted);
            info!(?toggle, "Swidget hidden");
            return Ok(false);
        }
        let directive = MountDirective::new(DEMO_BUNDLE_URL, DEMO_SWIDGET_NAME, DEMO_UNIQUE_ID)
            .with_props(Props::new().with_context(CONTEXT_PROP, self.context.handle()));
        let mounted = self.loader.mount(&self.region, directive).await?;
        self.slots[toggle.slot()] = Some(mounted);
        info!(?toggle, "Swidget shown");
        Ok(true)
    }

    /// Stamp the context and return the region's text
    pub fn render(&self) -> Result<String> {
        let render = self.renders.fetch_add(1, Ordering::Relaxed) + 1;
        self.context
            .handle()
            .set(STAMP_FIELD, format!("host render #{render}"))?;
        self.loader.mounts().region_text(&self.region)
    }
}

impl Drop for HostHome {
    fn drop(&mut self) {
        for slot in &mut self.slots {
            if let Some(mounted) = slot.take() {
                self.loader.unmount(mounted);
            }
        }
    }
}
