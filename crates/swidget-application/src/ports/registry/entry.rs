//! Swidget Entry Registry
//!
//! Entry points linked into the host binary. A bundle manifest names one of
//! these; the evaluator looks it up after validating the manifest.

use std::sync::Arc;

use swidget_domain::ports::SwidgetEntry;

/// Registry entry for a linked swidget entry point
pub struct SwidgetEntryRegistration {
    /// Entry identifier referenced by bundle manifests
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function creating the entry point
    pub factory: fn() -> Arc<dyn SwidgetEntry>,
}

// Auto-collection via linkme distributed slices
#[linkme::distributed_slice]
pub static SWIDGET_ENTRIES: [SwidgetEntryRegistration] = [..];

/// Find a linked entry point by name
pub fn find_linked_entry(name: &str) -> Option<&'static SwidgetEntryRegistration> {
    SWIDGET_ENTRIES.iter().find(|entry| entry.name == name)
}

/// List all linked entry points as `(name, description)` pairs
pub fn list_linked_entries() -> Vec<(&'static str, &'static str)> {
    SWIDGET_ENTRIES
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
