//! Bundle fetch and evaluation ports
//!
//! Fetching is the only suspending step of a mount. Evaluation turns the
//! fetched bytes into an entry point after checking the entry-point contract.

use super::entry::SwidgetEntry;
use crate::error::Result;
use crate::value_objects::{Bundle, BundleManifest, SwidgetMetadata};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Fetches bundles by URL
#[async_trait]
pub trait BundleSource: Send + Sync {
    /// Provider name for diagnostics
    fn source_name(&self) -> &str;

    /// Fetch the bundle at `url`
    ///
    /// Transport failures are reported as `Error::RemoteLoad`.
    async fn fetch(&self, url: &str) -> Result<Bundle>;
}

/// A bundle that passed evaluation
#[derive(Clone)]
pub struct EvaluatedModule {
    /// Parsed manifest
    pub manifest: BundleManifest,
    /// Resolved entry point
    pub entry: Arc<dyn SwidgetEntry>,
}

impl EvaluatedModule {
    /// Metadata from the manifest, falling back to the entry point's own
    pub fn metadata(&self) -> Option<SwidgetMetadata> {
        self.manifest
            .metadata
            .clone()
            .or_else(|| self.entry.metadata())
    }
}

impl fmt::Debug for EvaluatedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluatedModule")
            .field("manifest", &self.manifest)
            .finish_non_exhaustive()
    }
}

/// Turns fetched bundles into entry points
pub trait BundleEvaluator: Send + Sync {
    /// Validate `bundle` and resolve its entry point
    ///
    /// `expected_name` is the module name the host asked for; a manifest
    /// declaring another name violates the contract.
    fn evaluate(&self, bundle: &Bundle, expected_name: &str) -> Result<EvaluatedModule>;
}
