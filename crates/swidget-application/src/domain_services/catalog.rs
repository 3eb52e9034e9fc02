//! Entry catalog
//!
//! Entry points a manifest may name. Runtime registrations win over entries
//! linked in through [`SWIDGET_ENTRIES`](crate::ports::registry::SWIDGET_ENTRIES).

use crate::ports::registry::{find_linked_entry, list_linked_entries};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use swidget_domain::ports::SwidgetEntry;
use tracing::debug;

/// Entry points available to the evaluator
#[derive(Default)]
pub struct EntryCatalog {
    registered: DashMap<String, Arc<dyn SwidgetEntry>>,
    linked: DashMap<&'static str, Arc<dyn SwidgetEntry>>,
}

impl EntryCatalog {
    /// Empty catalog (linked entries are still visible)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry point under `name`, replacing any previous one
    pub fn register<N: Into<String>>(&self, name: N, entry: Arc<dyn SwidgetEntry>) {
        let name = name.into();
        debug!(entry = %name, "Registered swidget entry point");
        self.registered.insert(name, entry);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_entry<N: Into<String>>(self, name: N, entry: Arc<dyn SwidgetEntry>) -> Self {
        self.register(name, entry);
        self
    }

    /// Remove a runtime registration
    pub fn unregister(&self, name: &str) -> bool {
        self.registered.remove(name).is_some()
    }

    /// Look up an entry point
    ///
    /// Linked entries are created once and reused afterwards.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn SwidgetEntry>> {
        if let Some(entry) = self.registered.get(name) {
            return Some(Arc::clone(entry.value()));
        }
        let linked = find_linked_entry(name)?;
        let entry = self
            .linked
            .entry(linked.name)
            .or_insert_with(|| (linked.factory)());
        Some(Arc::clone(entry.value()))
    }

    /// True if `name` resolves
    pub fn contains(&self, name: &str) -> bool {
        self.registered.contains_key(name) || find_linked_entry(name).is_some()
    }

    /// All resolvable names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .registered
            .iter()
            .map(|entry| entry.key().clone())
            .chain(
                list_linked_entries()
                    .into_iter()
                    .map(|(name, _)| name.to_string()),
            )
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl fmt::Debug for EntryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryCatalog")
            .field("entries", &self.names())
            .finish()
    }
}
