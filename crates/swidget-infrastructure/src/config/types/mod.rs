//! Configuration types module

pub mod app;
pub mod host;
pub mod loader;
pub mod logging;

pub use app::*;
pub use host::{HostConfig, HttpConfig};
pub use loader::LoaderConfig;
pub use logging::LoggingConfig;
