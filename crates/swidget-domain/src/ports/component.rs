//! Component port

use crate::di::{DiContainer, Injectable, construct};
use crate::error::Result;
use crate::value_objects::{Node, Props};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What a component can see while rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderScope<'a> {
    /// Container of the application instance
    pub container: &'a DiContainer,
    /// Props handed to the instance
    pub props: &'a Props,
    /// Build-time configuration
    pub config: &'a Value,
    /// Current route path
    pub path: &'a str,
}

impl<'a> RenderScope<'a> {
    /// Same scope with another path
    pub fn with_path(self, path: &'a str) -> Self {
        Self { path, ..self }
    }
}

/// A renderable unit
pub trait Component: Send + Sync {
    /// Produce the render tree for the current state
    fn render(&self, scope: &RenderScope<'_>) -> Result<Node>;
}

type ComponentFactory = dyn Fn(&DiContainer) -> Result<Box<dyn Component>> + Send + Sync;

/// Recipe for creating a component inside a container
#[derive(Clone)]
pub struct ComponentRef {
    name: &'static str,
    factory: Arc<ComponentFactory>,
}

impl ComponentRef {
    /// Component built by a closure
    pub fn new<F>(name: &'static str, factory: F) -> Self
    where
        F: Fn(&DiContainer) -> Result<Box<dyn Component>> + Send + Sync + 'static,
    {
        Self {
            name,
            factory: Arc::new(factory),
        }
    }

    /// Injectable component: `Default` construction, then field injection
    pub fn injectable<C: Injectable + Component>() -> Self {
        Self::new(std::any::type_name::<C>(), |container| {
            let component: C = construct(container)?;
            Ok(Box::new(component))
        })
    }

    /// Stateless component cloned for every instance
    pub fn of<C: Component + Clone + 'static>(component: C) -> Self {
        Self::new(std::any::type_name::<C>(), move |_| {
            Ok(Box::new(component.clone()))
        })
    }

    /// Create an instance
    pub fn create(&self, container: &DiContainer) -> Result<Box<dyn Component>> {
        (self.factory)(container)
    }

    /// Diagnostic name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentRef").field(&self.name).finish()
    }
}
