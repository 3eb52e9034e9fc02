//! Configuration
//!
//! Layered loading (defaults, TOML file, environment) with validation.

pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, to_toml, validate_app_config};
pub use types::{AppConfig, HostConfig, HttpConfig, LoaderConfig, LoggingConfig};
