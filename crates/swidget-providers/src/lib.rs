//! # Swidget - Provider Implementations
//!
//! Bundle sources implementing the `BundleSource` port defined in
//! `swidget-domain`. Each source registers itself into the
//! `BUNDLE_SOURCES` registry with the URL schemes it serves.
//!
//! | Source | Schemes | Notes |
//! |--------|---------|-------|
//! | [`HttpBundleSource`] | `http`, `https` | reqwest, status and size checks |
//! | [`FileBundleSource`] | `file`, bare paths | tokio fs, optional root directory |
//! | [`MemoryBundleSource`] | `memory` | in-process, not registered; hosts install it per scheme |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! swidget-providers = { version = "0.1", default-features = false, features = ["source-http"] }
//! ```

pub use swidget_domain::error::{Error, Result};
pub use swidget_domain::ports::BundleSource;

/// Provider-specific constants
pub mod constants;

/// Bundle source implementations
pub mod source;

#[cfg(feature = "source-file")]
pub use source::FileBundleSource;
#[cfg(feature = "source-http")]
pub use source::HttpBundleSource;
#[cfg(feature = "source-memory")]
pub use source::MemoryBundleSource;
