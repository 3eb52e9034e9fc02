//! Loader configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use swidget_application::EvictionPolicy;
use swidget_domain::constants::DEFAULT_MAX_BUNDLE_BYTES;

/// Loader and module cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// What happens to a module record once nothing mounts it
    pub eviction: EvictionPolicy,
    /// Refuse to rebind an identifier in the same container
    pub strict_bindings: bool,
    /// Largest accepted bundle in bytes
    pub max_bundle_bytes: usize,
    /// Directory relative file URLs resolve against
    pub bundle_root: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            eviction: EvictionPolicy::Persist,
            strict_bindings: false,
            max_bundle_bytes: DEFAULT_MAX_BUNDLE_BYTES,
            bundle_root: None,
        }
    }
}
