//! Module cache key

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one logical swidget instance: `(name, unique_id)`
///
/// Two keys with the same name but different unique ids share nothing in the
/// module cache; each gets its own record and its own fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleKey {
    /// Logical module name
    pub name: String,
    /// Instance discriminator
    pub unique_id: String,
}

impl ModuleKey {
    /// Create a new key
    pub fn new<N: Into<String>, U: Into<String>>(name: N, unique_id: U) -> Self {
        Self {
            name: name.into(),
            unique_id: unique_id.into(),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.unique_id)
    }
}
