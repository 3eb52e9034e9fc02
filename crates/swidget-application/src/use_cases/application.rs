//! Application bootstrap
//!
//! An application instance (host or swidget) owns a container, runs its
//! `init` hook exactly once before the first render, and renders a root
//! component, by default the [`Route`] for the current path.

use super::routes::{Route, RouteTable};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use swidget_domain::di::DiContainer;
use swidget_domain::error::{Error, Result};
use swidget_domain::ports::{Component, ComponentRef, RenderScope};
use swidget_domain::value_objects::{Node, service_ids};
use tracing::{debug, error};

/// Registration hook run once per application instance
pub type InitHook = Arc<dyn Fn(&DiContainer) -> Result<()> + Send + Sync>;

/// Builder for [`Application`]
pub struct ApplicationBuilder {
    name: String,
    init: Option<InitHook>,
    config: Value,
    root: Option<ComponentRef>,
}

impl ApplicationBuilder {
    /// Set the `init` hook
    pub fn init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&DiContainer) -> Result<()> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(hook));
        self
    }

    /// Set the build-time configuration
    pub fn config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Render `root` instead of the route table
    pub fn root(mut self, root: ComponentRef) -> Self {
        self.root = Some(root);
        self
    }

    /// Run `init` against `container` and build the root component
    ///
    /// Any error is fatal to this application instance.
    pub fn bootstrap(self, container: DiContainer) -> Result<Application> {
        let name = self.name;
        let result = Self::prepare(&name, &container, &self.config, self.init, self.root);
        match result {
            Ok(root) => {
                debug!(app = %name, "Application bootstrapped");
                Ok(Application {
                    name,
                    container,
                    config: self.config,
                    root,
                })
            }
            Err(e) => {
                error!(app = %name, error = %e, "Application bootstrap failed");
                Err(e)
            }
        }
    }

    fn prepare(
        name: &str,
        container: &DiContainer,
        config: &Value,
        init: Option<InitHook>,
        root: Option<ComponentRef>,
    ) -> Result<Box<dyn Component>> {
        if !container.is_bound_locally(&service_ids::APP_NAME) {
            container.bind_constant(service_ids::APP_NAME, name.to_string())?;
        }
        if !container.is_bound_locally(&service_ids::CONFIG) {
            container.bind_constant(service_ids::CONFIG, config.clone())?;
        }
        if let Some(init) = init {
            init(container)?;
        }
        match root {
            Some(root) => root.create(container),
            None => {
                if !container.is_bound(&service_ids::ROUTES) {
                    return Err(Error::unresolved(service_ids::ROUTES.as_str()));
                }
                container.resolve::<RouteTable>(&service_ids::ROUTES)?;
                Route::component_ref().create(container)
            }
        }
    }
}

/// A bootstrapped application instance
pub struct Application {
    name: String,
    container: DiContainer,
    config: Value,
    root: Box<dyn Component>,
}

impl Application {
    /// Start building an application
    pub fn builder<S: Into<String>>(name: S) -> ApplicationBuilder {
        ApplicationBuilder {
            name: name.into(),
            init: None,
            config: Value::Null,
            root: None,
        }
    }

    /// Application name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The application's container
    pub fn container(&self) -> &DiContainer {
        &self.container
    }

    /// Build-time configuration
    pub fn config(&self) -> &Value {
        &self.config
    }
}

impl Component for Application {
    fn render(&self, scope: &RenderScope<'_>) -> Result<Node> {
        self.root.render(&RenderScope {
            container: &self.container,
            props: scope.props,
            config: &self.config,
            path: scope.path,
        })
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}
