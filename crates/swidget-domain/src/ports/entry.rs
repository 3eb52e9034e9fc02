//! Swidget entry-point port
//!
//! What a remote bundle exports: a callable that, given a container and the
//! host's props, returns the root component of the swidget.

use super::component::Component;
use crate::di::DiContainer;
use crate::error::Result;
use crate::value_objects::{Props, SwidgetMetadata};
use serde_json::Value;
use std::fmt;

/// Arguments of an entry-point call
#[derive(Debug, Clone)]
pub struct EntryArgs {
    /// Fresh child container for this instance
    pub container: DiContainer,
    /// Host props, verbatim
    pub props: Props,
    /// Build-time configuration from the bundle manifest
    pub config: Value,
}

/// Entry point exported by a swidget bundle
pub trait SwidgetEntry: Send + Sync {
    /// Introspection metadata
    fn metadata(&self) -> Option<SwidgetMetadata> {
        None
    }

    /// Instantiate the swidget's root component
    fn instantiate(&self, args: EntryArgs) -> Result<Box<dyn Component>>;
}

type EntryCallable = dyn Fn(EntryArgs) -> Result<Box<dyn Component>> + Send + Sync;

/// Entry point backed by a closure
pub struct EntryFn {
    callable: Box<EntryCallable>,
    metadata: Option<SwidgetMetadata>,
}

impl EntryFn {
    /// Wrap a closure
    pub fn new<F>(callable: F) -> Self
    where
        F: Fn(EntryArgs) -> Result<Box<dyn Component>> + Send + Sync + 'static,
    {
        Self {
            callable: Box::new(callable),
            metadata: None,
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: SwidgetMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl SwidgetEntry for EntryFn {
    fn metadata(&self) -> Option<SwidgetMetadata> {
        self.metadata.clone()
    }

    fn instantiate(&self, args: EntryArgs) -> Result<Box<dyn Component>> {
        (self.callable)(args)
    }
}

impl fmt::Debug for EntryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFn")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}
