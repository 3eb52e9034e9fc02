//! The "My-App" swidget
//!
//! `init` binds the route table, plus a [`TestService`] unless the host
//! already shares one. The root wraps the [`Route`] in a [`ContextWrapper`],
//! which stamps the shared context on every render.

use super::services::{DefaultTestService, TestService, test_service_id};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use swidget_application::ports::registry::{SWIDGET_ENTRIES, SwidgetEntryRegistration};
use swidget_application::{Application, Route, RouteTable};
use swidget_domain::constants::BUNDLE_FORMAT_VERSION;
use swidget_domain::di::{Binding, DiContainer, FieldInjections, Inject, Injectable};
use swidget_domain::error::{Error, Result};
use swidget_domain::ports::{Component, ComponentRef, EntryArgs, EntryFn, RenderScope, SwidgetEntry};
use swidget_domain::value_objects::{BundleManifest, Node, SwidgetMetadata, service_ids};
use tracing::debug;

/// Entry point identifier bundles reference
pub const MY_APP_ENTRY: &str = "my-app";

/// Application name
pub const MY_APP_NAME: &str = "My-App";

/// Prop carrying the shared context
pub const CONTEXT_PROP: &str = "myState";

/// Context field stamped on render
pub const STAMP_FIELD: &str = "foo";

/// Home route: greets with the injected service's text
#[derive(Default)]
pub struct Home {
    test_service: Inject<dyn TestService>,
}

impl Injectable for Home {
    fn decorate(fields: &mut FieldInjections<Self>) {
        fields.inject("test_service", test_service_id(), |home| {
            &mut home.test_service
        });
    }
}

impl Component for Home {
    fn render(&self, _scope: &RenderScope<'_>) -> Result<Node> {
        let greeting = format!("Hallo Swidget {}", self.test_service.get()?.test());
        Ok(Node::element("div")
            .with_attr("class", "container")
            .with_child(Node::text(greeting)))
    }
}

type Stamp = Arc<dyn Fn() -> Value + Send + Sync>;

/// Writes a stamp into the shared context, then renders its child
pub struct ContextWrapper {
    child: Box<dyn Component>,
    stamp: Stamp,
}

impl ContextWrapper {
    /// Wrapper stamping the current UTC time
    pub fn new(child: Box<dyn Component>) -> Self {
        Self::with_stamp(child, || Value::String(utc_time()))
    }

    /// Wrapper stamping whatever `stamp` returns
    pub fn with_stamp<F>(child: Box<dyn Component>, stamp: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self {
            child,
            stamp: Arc::new(stamp),
        }
    }
}

impl Component for ContextWrapper {
    fn render(&self, scope: &RenderScope<'_>) -> Result<Node> {
        if let Some(context) = scope.props.context(CONTEXT_PROP) {
            let value = (self.stamp)();
            match context.update(|fields| {
                fields.insert(STAMP_FIELD.to_string(), value);
            }) {
                Ok(()) => {}
                // The host went away; render what we have
                Err(Error::ContextClosed) => debug!("Shared context closed; stamp skipped"),
                Err(e) => return Err(e),
            }
        }
        self.child.render(scope)
    }
}

fn utc_time() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    let day = secs % 86_400;
    format!("{:02}:{:02}:{:02}", day / 3600, day % 3600 / 60, day % 60)
}

/// Route table of the swidget
pub fn routes() -> RouteTable {
    RouteTable::new().route("/", ComponentRef::injectable::<Home>())
}

/// Registration hook of the swidget
pub fn init(container: &DiContainer) -> Result<()> {
    let id = test_service_id();
    if !container.is_bound(&id) {
        let service: Arc<dyn TestService> = Arc::new(DefaultTestService);
        container.bind(id, Binding::constant_arc(service))?;
    }
    container.bind_constant(service_ids::ROUTES, routes())
}

/// Entry point of the swidget
pub fn my_app_entry() -> EntryFn {
    EntryFn::new(|args: EntryArgs| {
        let app = Application::builder(MY_APP_NAME)
            .init(init)
            .config(args.config)
            .root(ComponentRef::new("ContextWrapper", |container| {
                let route = Route::component_ref().create(container)?;
                Ok(Box::new(ContextWrapper::new(route)))
            }))
            .bootstrap(args.container)?;
        Ok(Box::new(app) as Box<dyn Component>)
    })
    .with_metadata(SwidgetMetadata {
        authors: Vec::new(),
        description: "My-App Swidget".to_string(),
    })
}

fn my_app_factory() -> Arc<dyn SwidgetEntry> {
    Arc::new(my_app_entry())
}

#[linkme::distributed_slice(SWIDGET_ENTRIES)]
static MY_APP: SwidgetEntryRegistration = SwidgetEntryRegistration {
    name: MY_APP_ENTRY,
    description: "My-App demo swidget",
    factory: my_app_factory,
};

/// Manifest of a bundle exporting the demo entry point under `name`
pub fn demo_manifest(name: &str) -> BundleManifest {
    BundleManifest {
        format: BUNDLE_FORMAT_VERSION,
        name: name.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        entry: MY_APP_ENTRY.to_string(),
        metadata: None,
        config: json!({"env": "demo"}),
    }
}
