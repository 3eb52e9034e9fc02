//! Application ports
//!
//! Registries through which providers and bundles plug into the loader.

pub mod registry;
