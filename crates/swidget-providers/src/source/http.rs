//! HTTP Bundle Source
//!
//! Fetches bundles over HTTP(S) with reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use swidget_domain::constants::DEFAULT_MAX_BUNDLE_BYTES;
use swidget_domain::error::{Error, LoadFailureKind, Result};
use swidget_domain::ports::BundleSource;
use swidget_domain::value_objects::Bundle;
use tracing::debug;

use crate::constants::{ERROR_MSG_REQUEST_TIMEOUT, HTTP_DEFAULT_TIMEOUT_SECS};

/// Bundle source for `http://` and `https://` URLs
///
/// Receives its HTTP client via constructor injection.
///
/// ## Example
///
/// ```rust,no_run
/// use swidget_providers::HttpBundleSource;
/// use reqwest::Client;
/// use std::time::Duration;
///
/// let source = HttpBundleSource::new(Client::new(), Duration::from_secs(10));
/// ```
pub struct HttpBundleSource {
    client: Client,
    timeout: Duration,
    max_bytes: usize,
}

impl HttpBundleSource {
    /// Create a source using `client`
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            max_bytes: DEFAULT_MAX_BUNDLE_BYTES,
        }
    }

    /// Set the body size limit
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn too_large(&self, url: &str, size: u64) -> Error {
        Error::remote_load(
            LoadFailureKind::ContractViolation,
            url,
            format!("bundle of at least {size} bytes exceeds the {} byte limit", self.max_bytes),
        )
    }
}

#[async_trait]
impl BundleSource for HttpBundleSource {
    fn source_name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Bundle> {
        debug!(url, "Fetching bundle over HTTP");
        let mut response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::remote_load(
                        LoadFailureKind::Network,
                        url,
                        format!("{} {:?}", ERROR_MSG_REQUEST_TIMEOUT, self.timeout),
                    )
                } else {
                    Error::remote_load(
                        LoadFailureKind::Network,
                        url,
                        format!("HTTP request failed: {e}"),
                    )
                }
            })?;

        let status = response.status();
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Err(Error::remote_load(
                LoadFailureKind::NotFound,
                url,
                format!("HTTP {status}"),
            ));
        }
        if !status.is_success() {
            return Err(Error::remote_load(
                LoadFailureKind::Network,
                url,
                format!("HTTP {status}"),
            ));
        }
        if let Some(length) = response.content_length() {
            if length > self.max_bytes as u64 {
                return Err(self.too_large(url, length));
            }
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        // Chunked responses carry no length; stop reading at the limit
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            Error::remote_load(
                LoadFailureKind::Network,
                url,
                format!("Failed to read response body: {e}"),
            )
        })? {
            let read = body.len() + chunk.len();
            if read > self.max_bytes {
                return Err(self.too_large(url, read as u64));
            }
            body.extend_from_slice(&chunk);
        }

        let bundle = Bundle::new(url, body);
        Ok(match content_type {
            Some(content_type) => bundle.with_content_type(content_type),
            None => bundle,
        })
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

use std::sync::Arc;

use swidget_application::ports::registry::{
    BUNDLE_SOURCES, BundleSourceConfig, BundleSourceEntry,
};

/// Factory function for creating HTTP bundle source instances.
fn http_factory(config: &BundleSourceConfig) -> std::result::Result<Arc<dyn BundleSource>, String> {
    let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(HTTP_DEFAULT_TIMEOUT_SECS));
    let user_agent = config
        .user_agent
        .clone()
        .unwrap_or_else(|| format!("swidget/{}", env!("CARGO_PKG_VERSION")));
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
    let source = HttpBundleSource::new(client, timeout)
        .with_max_bytes(config.max_bytes.unwrap_or(DEFAULT_MAX_BUNDLE_BYTES));
    Ok(Arc::new(source))
}

#[linkme::distributed_slice(BUNDLE_SOURCES)]
static HTTP_SOURCE: BundleSourceEntry = BundleSourceEntry {
    name: "http",
    schemes: &["http", "https"],
    description: "Fetch bundles over HTTP(S)",
    factory: http_factory,
};
