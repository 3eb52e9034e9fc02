//! # Swidget Infrastructure
//!
//! Cross-cutting concerns and the host composition root.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered configuration (defaults, TOML, environment) |
//! | [`logging`] | tracing subscriber setup |
//! | [`error_ext`] | Context extensions for foreign errors |
//! | [`source_router`] | Scheme-routed bundle source |
//! | [`bootstrap`] | `init_host` composition root |

// Force linkme registration of the bundle sources
extern crate swidget_providers;

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod source_router;

pub use bootstrap::{HostBuilder, HostRuntime, init_host};
pub use config::{AppConfig, ConfigLoader};
