//! Bindings
//!
//! How a service identifier produces its value.

use super::container::DiContainer;
use super::injection::{Injectable, construct};
use crate::error::{Error, Result};
use crate::value_objects::ServiceId;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// Type-erased service value
///
/// Always an `Arc<T>` boxed behind `Any`, so unsized targets such as
/// `dyn Trait` survive the round trip.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

type Constructor = Arc<dyn Fn(&DiContainer) -> Result<Instance> + Send + Sync>;

pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Instance {
    Arc::new(value)
}

pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(instance: &Instance) -> Option<Arc<T>> {
    instance.downcast_ref::<Arc<T>>().cloned()
}

/// Instance caching behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Constructed on first resolution, then shared
    Singleton,
    /// Constructed on every resolution
    Transient,
}

/// Binding kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Pre-built value
    Constant,
    /// Closure receiving the container
    Factory,
    /// `Default` construction followed by field injection
    Class,
}

enum Producer {
    Constant(Instance),
    Construct(Constructor),
}

/// A registered association between an identifier and its value
pub struct Binding {
    kind: BindingKind,
    scope: Scope,
    type_name: &'static str,
    producer: Producer,
    singleton: OnceCell<Instance>,
}

impl Binding {
    /// Bind a value
    pub fn constant<T: Send + Sync + 'static>(value: T) -> Self {
        Self::constant_arc(Arc::new(value))
    }

    /// Bind an already shared value (trait objects included)
    pub fn constant_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            kind: BindingKind::Constant,
            scope: Scope::Singleton,
            type_name: std::any::type_name::<T>(),
            producer: Producer::Constant(erase(value)),
            singleton: OnceCell::new(),
        }
    }

    /// Bind a factory closure (transient until scoped otherwise)
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&DiContainer) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            kind: BindingKind::Factory,
            scope: Scope::Transient,
            type_name: std::any::type_name::<T>(),
            producer: Producer::Construct(Arc::new(move |container| {
                factory(container).map(erase)
            })),
            singleton: OnceCell::new(),
        }
    }

    /// Bind an injectable type (transient until scoped otherwise)
    pub fn class<T: Injectable>() -> Self {
        Self {
            kind: BindingKind::Class,
            scope: Scope::Transient,
            type_name: std::any::type_name::<T>(),
            producer: Producer::Construct(Arc::new(|container| {
                construct::<T>(container).map(|value| erase(Arc::new(value)))
            })),
            singleton: OnceCell::new(),
        }
    }

    /// Cache the first constructed instance
    pub fn in_singleton_scope(mut self) -> Self {
        self.scope = Scope::Singleton;
        self
    }

    /// Construct on every resolution (ignored for constants)
    pub fn in_transient_scope(mut self) -> Self {
        if self.kind != BindingKind::Constant {
            self.scope = Scope::Transient;
        }
        self
    }

    /// Binding kind
    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Binding scope
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Name of the bound type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// True once a singleton instance has been cached
    pub fn is_resolved(&self) -> bool {
        matches!(self.producer, Producer::Constant(_)) || self.singleton.get().is_some()
    }

    pub(crate) fn produce(&self, owner: &DiContainer, id: &ServiceId) -> Result<Instance> {
        let constructor = match &self.producer {
            Producer::Constant(value) => return Ok(Arc::clone(value)),
            Producer::Construct(constructor) => constructor,
        };
        if let Some(cached) = self.singleton.get() {
            return Ok(Arc::clone(cached));
        }
        let _guard = ResolutionGuard::enter(self, id)?;
        match self.scope {
            Scope::Singleton => self
                .singleton
                .get_or_try_init(|| constructor(owner))
                .map(Arc::clone),
            Scope::Transient => constructor(owner),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("kind", &self.kind)
            .field("scope", &self.scope)
            .field("type", &self.type_name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<(usize, ServiceId)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a binding as under construction on this thread
///
/// Bindings are identified by address, so a child binding that shadows a
/// parent's identifier and delegates to it is not a cycle.
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(binding: &Binding, id: &ServiceId) -> Result<Self> {
        let address = std::ptr::from_ref(binding) as usize;
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(entry, _)| *entry == address) {
                let mut path: Vec<String> =
                    stack.iter().map(|(_, id)| id.as_str().to_string()).collect();
                path.push(id.as_str().to_string());
                return Err(Error::CircularDependency { path });
            }
            stack.push((address, id.clone()));
            Ok(Self)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
