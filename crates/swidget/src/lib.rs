//! # Swidget
//!
//! Runtime composition of independently built UI fragments ("swidgets").
//!
//! A host fetches a swidget bundle from a URL at runtime, mounts it into one
//! of its regions, and shares a dependency-injection container and a mutable
//! context with it.
//!
//! ## Example
//!
//! ```ignore
//! use swidget::application::MountDirective;
//! use swidget::infrastructure::{AppConfig, init_host};
//!
//! let runtime = init_host(AppConfig::default())?;
//! runtime.mounts().create_region("main");
//! let mounted = runtime
//!     .loader()
//!     .mount("main", MountDirective::new("https://cdn.example/swidget.json", "swidget", "s1"))
//!     .await?;
//! println!("{}", mounted.text());
//! ```
//!
//! ## Architecture
//!
//! - `domain` - DI container, shared context, render tree, ports, errors
//! - `application` - module cache, loader, mount points, application bootstrap
//! - `infrastructure` - configuration, logging, composition root
//! - `demo` - the "My-App" swidget and the two-toggle host page
//! - `cli` - the `swidget` command line

// Force-link swidget-providers to ensure linkme registrations are included
extern crate swidget_providers;

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use swidget_domain::*;
}

/// Application layer - use cases
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use swidget_application::*;
}

/// Infrastructure layer - config, logging, host bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use swidget_infrastructure::*;
}

pub mod cli;
pub mod demo;

// Re-export commonly used types at the crate root
pub use domain::{Error, LoadFailure, LoadFailureKind, Result};
pub use application::{MountDirective, MountedSwidget, SwidgetLoader};
pub use infrastructure::{AppConfig, HostRuntime, init_host};
