//! Main application configuration

use serde::{Deserialize, Serialize};

pub use super::host::{HostConfig, HttpConfig};
pub use super::loader::LoaderConfig;
pub use super::logging::LoggingConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Loader and module cache configuration
    #[serde(default)]
    pub loader: LoaderConfig,
    /// Remote bundle transport configuration
    #[serde(default)]
    pub http: HttpConfig,
    /// Host application configuration
    #[serde(default)]
    pub host: HostConfig,
}
