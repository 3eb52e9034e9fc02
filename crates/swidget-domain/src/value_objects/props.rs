//! Props passed from the host to a swidget instance

use crate::context::ContextHandle;
use serde_json::Value;
use std::collections::BTreeMap;

/// A single prop
///
/// Contexts travel by reference: every holder of a [`Prop::Context`] sees the
/// same store.
#[derive(Debug, Clone)]
pub enum Prop {
    /// Plain data
    Value(Value),
    /// Shared context handle
    Context(ContextHandle),
}

/// Props handed verbatim to an entry point
#[derive(Debug, Clone, Default)]
pub struct Props {
    entries: BTreeMap<String, Prop>,
}

impl Props {
    /// Empty props
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a data prop
    pub fn with_value<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.entries.insert(key.into(), Prop::Value(value.into()));
        self
    }

    /// Add a context prop
    pub fn with_context<K: Into<String>>(mut self, key: K, context: ContextHandle) -> Self {
        self.entries.insert(key.into(), Prop::Context(context));
        self
    }

    /// Insert or replace a prop
    pub fn insert<K: Into<String>>(&mut self, key: K, prop: Prop) {
        self.entries.insert(key.into(), prop);
    }

    /// Look up a prop
    pub fn get(&self, key: &str) -> Option<&Prop> {
        self.entries.get(key)
    }

    /// Look up a data prop
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.entries.get(key) {
            Some(Prop::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Look up a string data prop
    pub fn str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// Look up a context prop
    pub fn context(&self, key: &str) -> Option<&ContextHandle> {
        match self.entries.get(key) {
            Some(Prop::Context(context)) => Some(context),
            _ => None,
        }
    }

    /// All context props
    pub fn contexts(&self) -> impl Iterator<Item = (&str, &ContextHandle)> {
        self.entries.iter().filter_map(|(key, prop)| match prop {
            Prop::Context(context) => Some((key.as_str(), context)),
            Prop::Value(_) => None,
        })
    }

    /// Iterate over all props
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prop)> {
        self.entries.iter().map(|(key, prop)| (key.as_str(), prop))
    }

    /// Number of props
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no props are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
