//! In-memory Bundle Source
//!
//! Serves bundles registered at runtime. Counts fetches per URL, can be told
//! to fail a URL, and can hold fetches until released, which is what the
//! concurrency and cancellation tests need.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::watch;

use swidget_domain::error::{Error, LoadFailure, LoadFailureKind, Result};
use swidget_domain::ports::BundleSource;
use swidget_domain::value_objects::{Bundle, BundleManifest};
use tracing::trace;

use crate::constants::CONTENT_TYPE_JSON;

/// Bundle source backed by a map of URL to bytes
///
/// ```rust
/// use swidget_providers::MemoryBundleSource;
///
/// let source = MemoryBundleSource::new();
/// source.insert("memory://app.json", br#"{"format":1}"#.to_vec());
/// assert_eq!(source.fetch_count("memory://app.json"), 0);
/// ```
#[derive(Debug)]
pub struct MemoryBundleSource {
    bundles: DashMap<String, Vec<u8>>,
    failures: DashMap<String, LoadFailure>,
    fetches: DashMap<String, usize>,
    total: AtomicUsize,
    gate: watch::Sender<bool>,
}

impl MemoryBundleSource {
    /// Empty source with an open gate
    pub fn new() -> Self {
        Self {
            bundles: DashMap::new(),
            failures: DashMap::new(),
            fetches: DashMap::new(),
            total: AtomicUsize::new(0),
            gate: watch::Sender::new(true),
        }
    }

    /// Serve `bytes` at `url`
    pub fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        self.bundles.insert(url.into(), bytes);
    }

    /// Serve a manifest at `url`
    pub fn insert_manifest(&self, url: impl Into<String>, manifest: &BundleManifest) -> Result<()> {
        let bytes = serde_json::to_vec(manifest)?;
        self.insert(url, bytes);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_bundle(self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(url, bytes);
        self
    }

    /// Stop serving `url`
    pub fn remove(&self, url: &str) -> bool {
        self.bundles.remove(url).is_some()
    }

    /// Make every fetch of `url` fail
    pub fn fail(&self, url: impl Into<String>, kind: LoadFailureKind, message: impl Into<String>) {
        let url = url.into();
        let failure = LoadFailure::new(kind, url.clone(), message);
        self.failures.insert(url, failure);
    }

    /// Stop failing `url`
    pub fn recover(&self, url: &str) -> bool {
        self.failures.remove(url).is_some()
    }

    /// Hold every fetch until [`release`](Self::release)
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    /// Let held and future fetches complete
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Fetches issued for `url`
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.get(url).map_or(0, |count| *count)
    }

    /// Fetches issued for any URL
    pub fn total_fetches(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl Default for MemoryBundleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BundleSource for MemoryBundleSource {
    fn source_name(&self) -> &str {
        "memory"
    }

    async fn fetch(&self, url: &str) -> Result<Bundle> {
        *self.fetches.entry(url.to_string()).or_insert(0) += 1;
        self.total.fetch_add(1, Ordering::SeqCst);
        trace!(url, "Serving bundle from memory");

        let mut gate = self.gate.subscribe();
        if gate.wait_for(|open| *open).await.is_err() {
            return Err(Error::remote_load(
                LoadFailureKind::Network,
                url,
                "bundle source shut down",
            ));
        }

        if let Some(failure) = self.failures.get(url) {
            return Err(Error::RemoteLoad(failure.clone()));
        }
        let bytes = self.bundles.get(url).map(|bytes| bytes.clone()).ok_or_else(|| {
            Error::remote_load(LoadFailureKind::NotFound, url, "no bundle at this URL")
        })?;
        Ok(Bundle::new(url, bytes).with_content_type(CONTENT_TYPE_JSON))
    }
}
