//! DI container
//!
//! Wraps a [`ServiceRegistry`] and resolves identifiers through the parent
//! chain (chain of responsibility). Containers are cheap handles: clones share
//! the same registry.

use super::binding::{Binding, downcast};
use super::injection::Injectable;
use super::registry::ServiceRegistry;
use crate::error::{Error, Result};
use crate::value_objects::ServiceId;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, trace};

/// Container behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerOptions {
    /// Refuse to rebind an identifier already bound in the same container
    pub strict: bool,
}

impl ContainerOptions {
    /// Strict-mode options
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

struct ContainerInner {
    registry: RwLock<ServiceRegistry>,
    parent: Option<DiContainer>,
    options: ContainerOptions,
    depth: usize,
}

/// Dependency injection container
#[derive(Clone)]
pub struct DiContainer {
    inner: Arc<ContainerInner>,
}

impl DiContainer {
    /// Create a root container with default options
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Create a root container
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(ServiceRegistry::new()),
                parent: None,
                options,
                depth: 0,
            }),
        }
    }

    /// Create a child that resolves locally first, then through this container
    pub fn create_child(&self) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(ServiceRegistry::new()),
                parent: Some(self.clone()),
                options: self.inner.options,
                depth: self.inner.depth + 1,
            }),
        }
    }

    /// Register or replace a binding
    pub fn bind<I: Into<ServiceId>>(&self, id: I, binding: Binding) -> Result<()> {
        let id = id.into();
        let mut registry = self
            .inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if self.inner.options.strict && registry.contains(&id) {
            return Err(Error::duplicate_binding(id.as_str()));
        }
        debug!(
            id = %id,
            kind = ?binding.kind(),
            scope = ?binding.scope(),
            depth = self.inner.depth,
            "Binding service"
        );
        registry.insert(id, binding);
        Ok(())
    }

    /// Bind a constant value
    pub fn bind_constant<I, T>(&self, id: I, value: T) -> Result<()>
    where
        I: Into<ServiceId>,
        T: Send + Sync + 'static,
    {
        self.bind(id, Binding::constant(value))
    }

    /// Bind a transient factory
    pub fn bind_factory<I, T, F>(&self, id: I, factory: F) -> Result<()>
    where
        I: Into<ServiceId>,
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&DiContainer) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.bind(id, Binding::factory(factory))
    }

    /// Bind an injectable type as a singleton under its type identifier
    pub fn bind_class<T: Injectable>(&self) -> Result<()> {
        self.bind(ServiceId::of::<T>(), Binding::class::<T>().in_singleton_scope())
    }

    /// Remove a local binding; parents are untouched
    pub fn unbind(&self, id: &ServiceId) -> bool {
        self.inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    /// Resolve an identifier
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self, id: &ServiceId) -> Result<Arc<T>> {
        let instance = self.resolve_instance(id)?;
        downcast::<T>(&instance)
            .ok_or_else(|| Error::type_mismatch(id.as_str(), std::any::type_name::<T>()))
    }

    /// Resolve an identifier derived from the type
    pub fn resolve_type<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.resolve(&ServiceId::of::<T>())
    }

    /// Resolve, mapping an unbound identifier to `None`
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(
        &self,
        id: &ServiceId,
    ) -> Result<Option<Arc<T>>> {
        match self.resolve(id) {
            Ok(value) => Ok(Some(value)),
            Err(Error::UnresolvedDependency { id: missing }) if missing == id.as_str() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn resolve_instance(&self, id: &ServiceId) -> Result<super::binding::Instance> {
        let mut container = self;
        loop {
            if let Some(binding) = container.lookup_local(id) {
                trace!(id = %id, depth = container.inner.depth, "Resolved binding");
                return binding.produce(container, id);
            }
            match &container.inner.parent {
                Some(parent) => container = parent,
                None => return Err(Error::unresolved(id.as_str())),
            }
        }
    }

    fn lookup_local(&self, id: &ServiceId) -> Option<Arc<Binding>> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
    }

    /// True if bound here or in any parent
    pub fn is_bound(&self, id: &ServiceId) -> bool {
        self.is_bound_locally(id)
            || self
                .inner
                .parent
                .as_ref()
                .is_some_and(|parent| parent.is_bound(id))
    }

    /// True if bound in this container
    pub fn is_bound_locally(&self, id: &ServiceId) -> bool {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Identifiers bound in this container
    pub fn identifiers(&self) -> Vec<ServiceId> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ids()
    }

    /// Parent container, if chained
    pub fn parent(&self) -> Option<&DiContainer> {
        self.inner.parent.as_ref()
    }

    /// Number of ancestors
    pub fn depth(&self) -> usize {
        self.inner.depth
    }

    /// Container options
    pub fn options(&self) -> ContainerOptions {
        self.inner.options
    }

    /// True when both handles share the same registry
    pub fn same_container(&self, other: &DiContainer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for DiContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiContainer")
            .field("depth", &self.inner.depth)
            .field("options", &self.inner.options)
            .field("bindings", &self.identifiers())
            .finish()
    }
}
