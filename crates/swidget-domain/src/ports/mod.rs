//! Domain Port Interfaces
//!
//! Contracts between the loader and the code it composes: components, swidget
//! entry points, and the bundle fetch/evaluate seam.
//!
//! | Port | Implemented by |
//! |------|----------------|
//! | [`Component`] | swidget and host views |
//! | [`SwidgetEntry`] | remote bundles (via the entry catalog) |
//! | [`BundleSource`] | `swidget-providers` (http, file, memory) |
//! | [`BundleEvaluator`] | `swidget-application` (manifest evaluator) |

pub mod bundle;
pub mod component;
pub mod entry;

pub use bundle::{BundleEvaluator, BundleSource, EvaluatedModule};
pub use component::{Component, ComponentRef, RenderScope};
pub use entry::{EntryArgs, EntryFn, SwidgetEntry};
