//! File Bundle Source
//!
//! Reads bundles from the local filesystem. Accepts `file://` URLs and bare
//! paths; relative paths resolve against the configured root directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use swidget_domain::constants::DEFAULT_MAX_BUNDLE_BYTES;
use swidget_domain::error::{Error, LoadFailureKind, Result};
use swidget_domain::ports::BundleSource;
use swidget_domain::value_objects::Bundle;
use tracing::debug;

use crate::constants::CONTENT_TYPE_JSON;

/// Bundle source for `file://` URLs and plain paths
#[derive(Debug, Clone, Default)]
pub struct FileBundleSource {
    root: Option<PathBuf>,
    max_bytes: Option<usize>,
}

impl FileBundleSource {
    /// Source resolving relative paths against the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the file size limit
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Filesystem path a URL refers to
    pub fn resolve_path(&self, url: &str) -> PathBuf {
        let raw = url.strip_prefix("file://").unwrap_or(url);
        let path = Path::new(raw);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl BundleSource for FileBundleSource {
    fn source_name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, url: &str) -> Result<Bundle> {
        let path = self.resolve_path(url);
        debug!(url, path = %path.display(), "Reading bundle from disk");
        let limit = self.max_bytes.unwrap_or(DEFAULT_MAX_BUNDLE_BYTES);

        let read_error = |e: std::io::Error| {
            let kind = if e.kind() == ErrorKind::NotFound {
                LoadFailureKind::NotFound
            } else {
                LoadFailureKind::Network
            };
            Error::remote_load(kind, url, format!("{}: {e}", path.display()))
        };

        let metadata = tokio::fs::metadata(&path).await.map_err(read_error)?;
        if !metadata.is_file() {
            return Err(Error::remote_load(
                LoadFailureKind::NotFound,
                url,
                format!("{} is not a file", path.display()),
            ));
        }
        if metadata.len() > limit as u64 {
            return Err(Error::remote_load(
                LoadFailureKind::ContractViolation,
                url,
                format!("bundle is {} bytes, limit is {limit}", metadata.len()),
            ));
        }

        let bytes = tokio::fs::read(&path).await.map_err(read_error)?;
        Ok(Bundle::new(url, bytes).with_content_type(CONTENT_TYPE_JSON))
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use std::sync::Arc;

use swidget_application::ports::registry::{
    BUNDLE_SOURCES, BundleSourceConfig, BundleSourceEntry,
};

/// Factory function for creating file bundle source instances.
fn file_factory(config: &BundleSourceConfig) -> std::result::Result<Arc<dyn BundleSource>, String> {
    let mut source = FileBundleSource::new();
    if let Some(root) = &config.root_dir {
        source = source.with_root(root.clone());
    }
    if let Some(max_bytes) = config.max_bytes {
        source = source.with_max_bytes(max_bytes);
    }
    Ok(Arc::new(source))
}

#[linkme::distributed_slice(BUNDLE_SOURCES)]
static FILE_SOURCE: BundleSourceEntry = BundleSourceEntry {
    name: "file",
    schemes: &["file"],
    description: "Read bundles from the local filesystem",
    factory: file_factory,
};
