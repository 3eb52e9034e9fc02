//! Manifest evaluator
//!
//! The trust boundary between fetched bytes and executable code. A bundle is
//! parsed, shape-checked and only then mapped to an entry point from the
//! [`EntryCatalog`]; nothing in the bundle is executed.

use super::catalog::EntryCatalog;
use serde_json::Value;
use std::sync::Arc;
use swidget_domain::constants::{BUNDLE_FORMAT_VERSION, DEFAULT_MAX_BUNDLE_BYTES};
use swidget_domain::error::{Error, LoadFailureKind, Result};
use swidget_domain::ports::{BundleEvaluator, EvaluatedModule};
use swidget_domain::value_objects::{Bundle, BundleManifest};
use tracing::debug;

/// Default [`BundleEvaluator`]: JSON manifest plus entry catalog lookup
#[derive(Debug, Clone)]
pub struct ManifestEvaluator {
    catalog: Arc<EntryCatalog>,
    max_bundle_bytes: usize,
    format: u32,
}

impl ManifestEvaluator {
    /// Evaluator for the current manifest format
    pub fn new(catalog: Arc<EntryCatalog>) -> Self {
        Self {
            catalog,
            max_bundle_bytes: DEFAULT_MAX_BUNDLE_BYTES,
            format: BUNDLE_FORMAT_VERSION,
        }
    }

    /// Set the bundle size limit
    pub fn with_max_bundle_bytes(mut self, max_bundle_bytes: usize) -> Self {
        self.max_bundle_bytes = max_bundle_bytes;
        self
    }

    /// The catalog entry points are looked up in
    pub fn catalog(&self) -> &Arc<EntryCatalog> {
        &self.catalog
    }

    fn parse(&self, bundle: &Bundle) -> Result<BundleManifest> {
        let url = bundle.url.as_str();
        let fail = |kind, message: String| Error::remote_load(kind, url, message);

        if bundle.bytes.is_empty() {
            return Err(fail(LoadFailureKind::NotFound, "bundle is empty".into()));
        }
        if bundle.bytes.len() > self.max_bundle_bytes {
            return Err(fail(
                LoadFailureKind::ContractViolation,
                format!(
                    "bundle is {} bytes, limit is {}",
                    bundle.bytes.len(),
                    self.max_bundle_bytes
                ),
            ));
        }

        let raw: Value = serde_json::from_slice(&bundle.bytes)
            .map_err(|e| fail(LoadFailureKind::Malformed, format!("not a JSON manifest: {e}")))?;
        let Value::Object(fields) = &raw else {
            return Err(fail(
                LoadFailureKind::Malformed,
                "manifest must be a JSON object".into(),
            ));
        };

        // Check the format first: a newer manifest may carry fields we reject.
        let format = fields
            .get("format")
            .and_then(Value::as_u64)
            .ok_or_else(|| fail(LoadFailureKind::Malformed, "missing manifest format".into()))?;
        if format != u64::from(self.format) {
            return Err(fail(
                LoadFailureKind::VersionMismatch,
                format!("manifest format {format}, host understands {}", self.format),
            ));
        }

        serde_json::from_value(raw)
            .map_err(|e| fail(LoadFailureKind::Malformed, format!("invalid manifest: {e}")))
    }
}

impl BundleEvaluator for ManifestEvaluator {
    fn evaluate(&self, bundle: &Bundle, expected_name: &str) -> Result<EvaluatedModule> {
        let manifest = self.parse(bundle)?;
        let violation =
            |message: String| Error::remote_load(LoadFailureKind::ContractViolation, &bundle.url, message);

        if manifest.name != expected_name {
            return Err(violation(format!(
                "bundle declares module '{}', expected '{expected_name}'",
                manifest.name
            )));
        }
        if manifest.entry.trim().is_empty() {
            return Err(violation("manifest names no entry point".into()));
        }
        if manifest.version.trim().is_empty() {
            return Err(violation("manifest has an empty version".into()));
        }
        if let Some(metadata) = &manifest.metadata {
            if metadata.authors.iter().any(|author| author.trim().is_empty()) {
                return Err(violation("metadata lists an empty author".into()));
            }
        }

        let entry = self.catalog.resolve(&manifest.entry).ok_or_else(|| {
            violation(format!(
                "entry point '{}' is not exported by this host",
                manifest.entry
            ))
        })?;

        debug!(
            module = %manifest.name,
            version = %manifest.version,
            entry = %manifest.entry,
            url = %bundle.url,
            "Evaluated bundle"
        );
        Ok(EvaluatedModule { manifest, entry })
    }
}
