//! Bundle sources
//!
//! Each source fetches bundle bytes for the schemes it serves and reports
//! every failure as a `RemoteLoad` error with a [`LoadFailureKind`].
//!
//! [`LoadFailureKind`]: swidget_domain::error::LoadFailureKind

#[cfg(feature = "source-file")]
pub mod file;
#[cfg(feature = "source-http")]
pub mod http;
#[cfg(feature = "source-memory")]
pub mod memory;

#[cfg(feature = "source-file")]
pub use file::FileBundleSource;
#[cfg(feature = "source-http")]
pub use http::HttpBundleSource;
#[cfg(feature = "source-memory")]
pub use memory::MemoryBundleSource;
