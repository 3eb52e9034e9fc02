//! Dependency injection
//!
//! A string-keyed container with constant, factory and class bindings,
//! singleton/transient scopes, chained child containers and explicit field
//! injection.
//!
//! ## Architecture
//!
//! ```text
//! DiContainer (host)
//! ├── ServiceRegistry   id → Binding
//! └── create_child() ──► DiContainer (swidget instance)
//!                        ├── ServiceRegistry   (own bindings, shadow parent)
//!                        └── miss → parent.resolve()
//! ```
//!
//! Field injection uses an explicit side-table keyed by type: a type lists its
//! injected slots once in [`Injectable::decorate`], and [`activate`] fills them
//! right after construction.

pub mod binding;
pub mod container;
pub mod injection;
pub mod registry;

pub use binding::{Binding, BindingKind, Scope};
pub use container::{ContainerOptions, DiContainer};
pub use injection::{FieldInjections, Inject, Injectable, InjectionRegistry, activate, construct};
pub use registry::ServiceRegistry;
