//! Domain services
//!
//! Turning fetched bundles into entry points.

pub mod catalog;
pub mod evaluator;

pub use catalog::EntryCatalog;
pub use evaluator::ManifestEvaluator;
