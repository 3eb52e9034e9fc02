//! Host and transport configuration types

use crate::constants::{DEFAULT_HOST_NAME, DEFAULT_HTTP_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use swidget_domain::constants::DEFAULT_ROUTE_PATH;

/// Remote bundle transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with bundle requests
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: format!("swidget/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Host application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Host application name
    pub name: String,
    /// Route path used when a mount does not choose one
    pub default_route: String,
    /// Environment-selected configuration handed unchanged to the host
    /// application
    pub build_config: BTreeMap<String, serde_json::Value>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_HOST_NAME.to_string(),
            default_route: DEFAULT_ROUTE_PATH.to_string(),
            build_config: BTreeMap::new(),
        }
    }
}
