//! Service registry
//!
//! Identifier → binding map owned by exactly one container.

use super::binding::Binding;
use crate::value_objects::ServiceId;
use std::collections::HashMap;
use std::sync::Arc;

/// Identifier to binding map
#[derive(Default)]
pub struct ServiceRegistry {
    bindings: HashMap<ServiceId, Arc<Binding>>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binding, returning the one it replaced
    pub fn insert(&mut self, id: ServiceId, binding: Binding) -> Option<Arc<Binding>> {
        self.bindings.insert(id, Arc::new(binding))
    }

    /// Look up a binding
    pub fn get(&self, id: &ServiceId) -> Option<Arc<Binding>> {
        self.bindings.get(id).cloned()
    }

    /// Remove a binding
    pub fn remove(&mut self, id: &ServiceId) -> Option<Arc<Binding>> {
        self.bindings.remove(id)
    }

    /// True if the identifier is bound here
    pub fn contains(&self, id: &ServiceId) -> bool {
        self.bindings.contains_key(id)
    }

    /// Bound identifiers, sorted
    pub fn ids(&self) -> Vec<ServiceId> {
        let mut ids: Vec<ServiceId> = self.bindings.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True when nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.bindings.iter().map(|(id, binding)| (id.as_str(), binding)))
            .finish()
    }
}
