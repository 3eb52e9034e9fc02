//! # Swidget Domain
//!
//! Core types of the swidget runtime composition engine: loading
//! independently built UI fragments ("swidgets") into a host application at
//! runtime.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`di`] | Dependency injection container, bindings, field injection |
//! | [`context`] | Shared context store crossing the host/swidget boundary |
//! | [`value_objects`] | Identifiers, render tree, bundle manifest, props |
//! | [`ports`] | Component, entry-point and bundle source/evaluator contracts |
//! | [`error`] | Error taxonomy |

pub mod constants;
pub mod context;
pub mod di;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, LoadFailure, LoadFailureKind, Result};
