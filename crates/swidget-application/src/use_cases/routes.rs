//! Route table and the `Route` component
//!
//! Patterns are `/`-separated segments: literals match exactly, `:name`
//! captures one segment, a trailing `*` captures the rest. The first entry
//! in insertion order that matches wins.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use swidget_domain::error::Result;
use swidget_domain::ports::{Component, ComponentRef, RenderScope};
use swidget_domain::value_objects::{Node, service_ids};
use tracing::trace;

/// One `(path, component)` pair
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Path pattern
    pub path: String,
    /// Component rendered when the pattern matches
    pub component: ComponentRef,
}

/// A successful match
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// Position of the entry in the table
    pub index: usize,
    /// The matching entry
    pub entry: &'a RouteEntry,
    /// Captured `:param` and `*` segments
    pub params: BTreeMap<String, String>,
}

/// Ordered routes of one application instance
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`push`](Self::push)
    pub fn route<P: Into<String>>(mut self, path: P, component: ComponentRef) -> Self {
        self.push(path, component);
        self
    }

    /// Append an entry
    pub fn push<P: Into<String>>(&mut self, path: P, component: ComponentRef) {
        self.entries.push(RouteEntry {
            path: path.into(),
            component,
        });
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no routes are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry matching `path`
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries
            .iter()
            .enumerate()
            .find_map(|(index, entry)| {
                match_pattern(&entry.path, path).map(|params| RouteMatch {
                    index,
                    entry,
                    params,
                })
            })
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let pattern = segments(pattern);
    let path = segments(path);
    let mut params = BTreeMap::new();

    for (i, part) in pattern.iter().enumerate() {
        if *part == "*" && i + 1 == pattern.len() {
            params.insert("*".to_string(), path.get(i..).unwrap_or_default().join("/"));
            return Some(params);
        }
        let segment = path.get(i)?;
        match part.strip_prefix(':') {
            Some(name) => {
                params.insert(name.to_string(), (*segment).to_string());
            }
            None if part == segment => {}
            None => return None,
        }
    }
    (pattern.len() == path.len()).then_some(params)
}

/// Renders the route matching the current path
///
/// The component of the active route is kept across renders and recreated
/// when navigation selects another route.
#[derive(Default)]
pub struct Route {
    active: Mutex<Option<(usize, Arc<dyn Component>)>>,
}

impl Route {
    /// Route component with no active route
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipe creating a fresh `Route`
    pub fn component_ref() -> ComponentRef {
        ComponentRef::new("Route", |_| Ok(Box::new(Route::new())))
    }
}

impl Component for Route {
    fn render(&self, scope: &RenderScope<'_>) -> Result<Node> {
        let routes = scope
            .container
            .resolve::<RouteTable>(&service_ids::ROUTES)?;
        let Some(matched) = routes.match_path(scope.path) else {
            trace!(path = scope.path, "No route matches");
            *self.active.lock().unwrap_or_else(PoisonError::into_inner) = None;
            return Ok(Node::Empty);
        };

        let component = {
            let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
            let current = match active.as_ref() {
                Some((index, component)) if *index == matched.index => Some(Arc::clone(component)),
                _ => None,
            };
            match current {
                Some(component) => component,
                None => {
                    trace!(path = scope.path, route = %matched.entry.path, "Activating route");
                    let component: Arc<dyn Component> =
                        Arc::from(matched.entry.component.create(scope.container)?);
                    *active = Some((matched.index, Arc::clone(&component)));
                    component
                }
            }
        };
        // Render outside the lock: the child may update a context that
        // re-renders this instance.
        component.render(scope)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let active = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(index, _)| *index);
        f.debug_struct("Route").field("active", &active).finish()
    }
}
