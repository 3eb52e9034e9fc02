//! Application Layer - Swidget
//!
//! Orchestrates the domain: loading remote bundles once per logical
//! instance, mounting them into host regions, and bootstrapping application
//! instances.
//!
//! ## Use Cases
//!
//! - Module caching with in-flight sharing and explicit eviction
//! - Mount / unmount / re-render of swidget instances
//! - Application bootstrap (`init` hook, route table)
//!
//! ## Ports
//!
//! - `ports::registry::*`: linkme registries for bundle sources and entry points
//! - `domain_services::*`: manifest evaluation and the entry catalog
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `swidget-domain`: DI container, context store, value objects and ports
//! - Pure Rust libraries for async, serialization, etc.

pub mod domain_services;
pub mod ports;
pub mod use_cases;

pub use domain_services::*;
pub use use_cases::*;
