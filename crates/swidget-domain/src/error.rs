//! Error handling types

use crate::value_objects::ModuleKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Why a remote bundle could not be turned into a usable module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailureKind {
    /// Transport failure while fetching the bundle
    Network,
    /// The bundle location answered but holds nothing
    NotFound,
    /// The bundle bytes are not a readable manifest
    Malformed,
    /// The manifest targets a format this host does not speak
    VersionMismatch,
    /// The manifest or its entry point breaks the entry-point contract
    ContractViolation,
}

impl fmt::Display for LoadFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::NotFound => "not found",
            Self::Malformed => "malformed bundle",
            Self::VersionMismatch => "version mismatch",
            Self::ContractViolation => "contract violation",
        };
        f.write_str(name)
    }
}

/// A remote load failure
///
/// Cloneable so that every requester attached to the same in-flight fetch
/// receives the same outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Module the failure belongs to (unset while evaluating a detached bundle)
    pub key: Option<ModuleKey>,
    /// Bundle location
    pub url: String,
    /// Failure category
    pub kind: LoadFailureKind,
    /// Human readable detail
    pub message: String,
}

impl LoadFailure {
    /// Create a failure for a bundle URL
    pub fn new<U: Into<String>, M: Into<String>>(kind: LoadFailureKind, url: U, message: M) -> Self {
        Self {
            key: None,
            url: url.into(),
            kind,
            message: message.into(),
        }
    }

    /// Attach the module key
    pub fn with_key(mut self, key: ModuleKey) -> Self {
        self.key = Some(key);
        self
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(
                f,
                "{} loading {} from {}: {}",
                self.kind, key, self.url, self.message
            ),
            None => write!(f, "{} loading {}: {}", self.kind, self.url, self.message),
        }
    }
}

/// Main error type for Swidget
#[derive(Error, Debug)]
pub enum Error {
    /// Strict-mode container refused to rebind an identifier
    #[error("Duplicate binding: {id}")]
    DuplicateBinding {
        /// The identifier that is already bound
        id: String,
    },

    /// Identifier is bound neither in the container nor in any parent
    #[error("Unresolved dependency: {id}")]
    UnresolvedDependency {
        /// The identifier that could not be resolved
        id: String,
    },

    /// Identifier resolved to a value of a different type
    #[error("Service type mismatch for {id}: expected {expected}")]
    ServiceTypeMismatch {
        /// The identifier that was resolved
        id: String,
        /// The type the caller asked for
        expected: &'static str,
    },

    /// A binding depends on itself, directly or transitively
    #[error("Circular dependency: {}", path.join(" -> "))]
    CircularDependency {
        /// Identifiers on the construction stack, closing the cycle
        path: Vec<String>,
    },

    /// An injected slot was read before activation
    #[error("Not injected: {target}")]
    NotInjected {
        /// Type held by the empty slot
        target: &'static str,
    },

    /// Fetching, evaluating or validating a remote bundle failed
    #[error("Remote load error: {0}")]
    RemoteLoad(LoadFailure),

    /// The host region a swidget was asked to mount into does not exist
    #[error("Mount target unavailable: {target}")]
    MountTargetUnavailable {
        /// Region identifier
        target: String,
    },

    /// The shared context was destroyed by its owner
    #[error("Shared context is closed")]
    ContextClosed,

    /// A conditional context update lost a race against another writer
    #[error("Stale context: expected version {expected}, current version {actual}")]
    StaleContext {
        /// Version the writer based its update on
        expected: u64,
        /// Version found in the store
        actual: u64,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network-related error
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Dependency injection error creation methods
impl Error {
    /// Create a duplicate binding error
    pub fn duplicate_binding<S: Into<String>>(id: S) -> Self {
        Self::DuplicateBinding { id: id.into() }
    }

    /// Create an unresolved dependency error
    pub fn unresolved<S: Into<String>>(id: S) -> Self {
        Self::UnresolvedDependency { id: id.into() }
    }

    /// Create a type mismatch error
    pub fn type_mismatch<S: Into<String>>(id: S, expected: &'static str) -> Self {
        Self::ServiceTypeMismatch {
            id: id.into(),
            expected,
        }
    }
}

// Loading and mounting error creation methods
impl Error {
    /// Create a remote load error
    pub fn remote_load<U: Into<String>, M: Into<String>>(
        kind: LoadFailureKind,
        url: U,
        message: M,
    ) -> Self {
        Self::RemoteLoad(LoadFailure::new(kind, url, message))
    }

    /// Create a mount target error
    pub fn mount_target_unavailable<S: Into<String>>(target: S) -> Self {
        Self::MountTargetUnavailable {
            target: target.into(),
        }
    }

    /// The load failure carried by this error, if any
    pub fn load_failure(&self) -> Option<&LoadFailure> {
        match self {
            Self::RemoteLoad(failure) => Some(failure),
            _ => None,
        }
    }
}

// Infrastructure error creation methods
impl Error {
    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<LoadFailure> for Error {
    fn from(failure: LoadFailure) -> Self {
        Self::RemoteLoad(failure)
    }
}
