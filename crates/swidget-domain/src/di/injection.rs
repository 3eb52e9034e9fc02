//! Field injection
//!
//! A type declares its injected slots once, in [`Injectable::decorate`]. The
//! declarations land in a side-table keyed by [`TypeId`]; [`activate`] walks
//! that table after construction and fills every slot from the container.
//!
//! ## Usage
//!
//! ```
//! use swidget_domain::di::{DiContainer, FieldInjections, Inject, Injectable, construct};
//! use swidget_domain::value_objects::ServiceId;
//!
//! #[derive(Default)]
//! struct Greeter;
//!
//! #[derive(Default)]
//! struct Home {
//!     greeter: Inject<Greeter>,
//! }
//!
//! impl Injectable for Home {
//!     fn decorate(fields: &mut FieldInjections<Self>) {
//!         fields.inject("greeter", ServiceId::of::<Greeter>(), |home| &mut home.greeter);
//!     }
//! }
//!
//! let container = DiContainer::new();
//! container.bind_constant(ServiceId::of::<Greeter>(), Greeter).unwrap();
//! let home: Home = construct(&container).unwrap();
//! assert!(home.greeter.is_injected());
//! ```

use super::container::DiContainer;
use crate::error::{Error, Result};
use crate::value_objects::ServiceId;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Slot filled by [`activate`]
pub struct Inject<T: ?Sized> {
    slot: Option<Arc<T>>,
}

impl<T: ?Sized> Inject<T> {
    /// Empty slot
    pub fn empty() -> Self {
        Self { slot: None }
    }

    /// Pre-filled slot, bypassing the container
    pub fn with(value: Arc<T>) -> Self {
        Self { slot: Some(value) }
    }

    /// Borrow the injected value
    pub fn get(&self) -> Result<&T> {
        self.slot.as_deref().ok_or(Error::NotInjected {
            target: std::any::type_name::<T>(),
        })
    }

    /// Clone the injected `Arc`
    pub fn arc(&self) -> Result<Arc<T>> {
        self.slot.clone().ok_or(Error::NotInjected {
            target: std::any::type_name::<T>(),
        })
    }

    /// True once filled
    pub fn is_injected(&self) -> bool {
        self.slot.is_some()
    }

    fn set(&mut self, value: Arc<T>) {
        self.slot = Some(value);
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: ?Sized> Clone for Inject<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("target", &std::any::type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

/// A type whose fields are filled from a container after construction
pub trait Injectable: Default + Send + Sync + 'static {
    /// Record the injected fields
    fn decorate(fields: &mut FieldInjections<Self>);
}

type Assign<S> = Box<dyn Fn(&mut S, &DiContainer) -> Result<()> + Send + Sync>;

struct InjectionPoint<S> {
    field: &'static str,
    id: ServiceId,
    assign: Assign<S>,
}

/// Injection table of one type: `(field, identifier)` pairs plus setters
pub struct FieldInjections<S> {
    points: Vec<InjectionPoint<S>>,
}

impl<S: 'static> FieldInjections<S> {
    fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Mark `field` as injected with the value bound to `id`
    pub fn inject<T, I>(
        &mut self,
        field: &'static str,
        id: I,
        accessor: fn(&mut S) -> &mut Inject<T>,
    ) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        I: Into<ServiceId>,
    {
        let id = id.into();
        let lookup = id.clone();
        self.points.push(InjectionPoint {
            field,
            id,
            assign: Box::new(move |target, container| {
                let value = container.resolve::<T>(&lookup)?;
                accessor(target).set(value);
                Ok(())
            }),
        });
        self
    }

    /// Recorded `(field, identifier)` pairs, in declaration order
    pub fn fields(&self) -> Vec<(&'static str, ServiceId)> {
        self.points
            .iter()
            .map(|point| (point.field, point.id.clone()))
            .collect()
    }

    /// Number of injected fields
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the type injects nothing
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

static TABLES: Lazy<DashMap<TypeId, Arc<dyn Any + Send + Sync>>> = Lazy::new(DashMap::new);

/// Process-wide side-table of injection metadata, keyed by type
pub struct InjectionRegistry;

impl InjectionRegistry {
    /// Record the injection table of `S` (idempotent)
    pub fn decorate<S: Injectable>() -> Result<Arc<FieldInjections<S>>> {
        let entry = TABLES
            .entry(TypeId::of::<S>())
            .or_insert_with(|| {
                let mut fields = FieldInjections::new();
                S::decorate(&mut fields);
                trace!(
                    target_type = std::any::type_name::<S>(),
                    fields = fields.len(),
                    "Decorated injectable"
                );
                let table: Arc<dyn Any + Send + Sync> = Arc::new(fields);
                table
            })
            .clone();
        entry.downcast::<FieldInjections<S>>().map_err(|_| {
            Error::internal(format!(
                "injection table type mismatch for {}",
                std::any::type_name::<S>()
            ))
        })
    }

    /// The recorded table of `S`, if decorated
    pub fn table<S: 'static>() -> Option<Arc<FieldInjections<S>>> {
        TABLES
            .get(&TypeId::of::<S>())
            .map(|entry| Arc::clone(entry.value()))
            .and_then(|entry| entry.downcast::<FieldInjections<S>>().ok())
    }

    /// True if `S` has been decorated
    pub fn is_decorated<S: 'static>() -> bool {
        TABLES.contains_key(&TypeId::of::<S>())
    }
}

/// Fill every injected field of `target` from `container`
pub fn activate<S: Injectable>(container: &DiContainer, target: &mut S) -> Result<()> {
    let table = InjectionRegistry::decorate::<S>()?;
    for point in &table.points {
        trace!(field = point.field, id = %point.id, "Injecting field");
        (point.assign)(target, container)?;
    }
    Ok(())
}

/// Construct with `Default` and activate
pub fn construct<S: Injectable>(container: &DiContainer) -> Result<S> {
    let mut target = S::default();
    activate(container, &mut target)?;
    Ok(target)
}
