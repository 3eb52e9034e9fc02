//! Bundle value objects
//!
//! A bundle is the raw resource fetched from a swidget URL. Its body is a JSON
//! manifest naming the entry point to instantiate, the metadata exposed to the
//! host and the build-time configuration passed through to the entry point.

use serde::{Deserialize, Serialize};

/// Raw bundle as returned by a bundle source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Location the bundle was fetched from
    pub url: String,
    /// Body bytes
    pub bytes: Vec<u8>,
    /// Content type reported by the transport, if any
    pub content_type: Option<String>,
}

impl Bundle {
    /// Create a bundle from its body
    pub fn new<U: Into<String>>(url: U, bytes: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            bytes,
            content_type: None,
        }
    }

    /// Set the content type
    pub fn with_content_type<S: Into<String>>(mut self, content_type: S) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Introspection record a swidget may expose
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwidgetMetadata {
    /// Authors
    #[serde(default)]
    pub authors: Vec<String>,
    /// Short description
    #[serde(default)]
    pub description: String,
}

impl SwidgetMetadata {
    /// Metadata with a description and no authors
    pub fn described<S: Into<String>>(description: S) -> Self {
        Self {
            authors: Vec::new(),
            description: description.into(),
        }
    }
}

/// Parsed bundle manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleManifest {
    /// Manifest format version
    pub format: u32,
    /// Logical module name; must equal the mount directive's name
    pub name: String,
    /// Bundle version
    pub version: String,
    /// Entry point identifier exported by the bundle
    pub entry: String,
    /// Optional introspection metadata
    #[serde(default)]
    pub metadata: Option<SwidgetMetadata>,
    /// Build-time configuration, passed unchanged to the entry point
    #[serde(default)]
    pub config: serde_json::Value,
}
