//! Shared context store
//!
//! One mutable record shared between the host and every mounted swidget.
//!
//! The host owns the canonical state ([`SharedContext`]); everybody else holds
//! a [`ContextHandle`]. Readers get immutable, versioned snapshots. Writers go
//! through [`ContextHandle::update`], which swaps in a new snapshot and
//! notifies subscribers synchronously before returning.
//!
//! ```text
//! host ── SharedContext::create(defaults)
//!             │ handle()
//!             ▼
//!        ContextHandle ──(Prop::Context)──► swidget instance
//!             │ update(|fields| ...)              │ subscribe(cb)
//!             ▼                                   ▼
//!        snapshot v+1 ─────── notify ────────► re-render
//! ```

use crate::constants::MAX_CONTEXT_NOTIFY_ROUNDS;
use crate::error::{Error, Result};
use arc_swap::ArcSwap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::{debug, warn};
use uuid::Uuid;

/// Field map held by a context
pub type ContextFields = Map<String, Value>;

type Subscriber = Arc<dyn Fn(&ContextSnapshot) + Send + Sync>;

/// Immutable view of the context at one version
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSnapshot {
    version: u64,
    fields: ContextFields,
}

impl ContextSnapshot {
    /// Monotonic version, starting at 0 for the default snapshot
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All fields
    pub fn fields(&self) -> &ContextFields {
        &self.fields
    }

    /// A single field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// A string field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }
}

#[derive(Default)]
struct DispatchState {
    active: bool,
    pending: bool,
}

struct ContextInner {
    id: Uuid,
    current: ArcSwap<ContextSnapshot>,
    writer: Mutex<()>,
    subscribers: Mutex<Vec<(u64, Subscriber)>>,
    dispatch: Mutex<DispatchState>,
    next_subscription: AtomicU64,
    closed: AtomicBool,
}

impl ContextInner {
    fn apply<R>(
        &self,
        expected: Option<u64>,
        mutate: impl FnOnce(&mut ContextFields) -> R,
    ) -> Result<R> {
        let outcome = {
            let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
            if self.closed.load(Ordering::Acquire) {
                return Err(Error::ContextClosed);
            }
            let current = self.current.load();
            if let Some(expected) = expected {
                if current.version != expected {
                    return Err(Error::StaleContext {
                        expected,
                        actual: current.version,
                    });
                }
            }
            let mut fields = current.fields.clone();
            let outcome = mutate(&mut fields);
            if fields == current.fields {
                return Ok(outcome);
            }
            let version = current.version + 1;
            self.current
                .store(Arc::new(ContextSnapshot { version, fields }));
            debug!(context = %self.id, version, "Context updated");
            outcome
        };
        self.notify();
        Ok(outcome)
    }

    fn notify(&self) {
        {
            let mut state = self.dispatch.lock().unwrap_or_else(PoisonError::into_inner);
            if state.active {
                state.pending = true;
                return;
            }
            state.active = true;
        }

        let mut rounds = 0;
        loop {
            let snapshot = self.current.load_full();
            let subscribers: Vec<Subscriber> = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|(_, subscriber)| Arc::clone(subscriber))
                .collect();
            for subscriber in &subscribers {
                subscriber(&snapshot);
            }
            rounds += 1;

            let mut state = self.dispatch.lock().unwrap_or_else(PoisonError::into_inner);
            if !state.pending {
                state.active = false;
                break;
            }
            state.pending = false;
            if rounds >= MAX_CONTEXT_NOTIFY_ROUNDS {
                state.active = false;
                warn!(
                    context = %self.id,
                    rounds,
                    "Context updates keep arriving from subscribers; dropping further notifications"
                );
                break;
            }
        }
    }
}

/// Canonical owner of a shared context
///
/// Dropping the owner closes the context (the host application unmounted).
pub struct SharedContext {
    handle: ContextHandle,
}

impl SharedContext {
    /// Create a context initialised with a default snapshot
    pub fn create(defaults: ContextFields) -> Self {
        let inner = ContextInner {
            id: Uuid::new_v4(),
            current: ArcSwap::from_pointee(ContextSnapshot {
                version: 0,
                fields: defaults,
            }),
            writer: Mutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            dispatch: Mutex::new(DispatchState::default()),
            next_subscription: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        };
        Self {
            handle: ContextHandle {
                inner: Arc::new(inner),
            },
        }
    }

    /// Create a context from a JSON object
    ///
    /// Non-object values produce an empty default snapshot.
    pub fn from_value(defaults: Value) -> Self {
        match defaults {
            Value::Object(fields) => Self::create(fields),
            _ => Self::create(ContextFields::new()),
        }
    }

    /// Handle for other holders
    pub fn handle(&self) -> ContextHandle {
        self.handle.clone()
    }

    /// Current snapshot
    pub fn get(&self) -> Arc<ContextSnapshot> {
        self.handle.get()
    }

    /// Apply a mutation and notify subscribers
    pub fn update<R>(&self, mutate: impl FnOnce(&mut ContextFields) -> R) -> Result<R> {
        self.handle.update(mutate)
    }

    /// Destroy the context: further updates fail, subscribers are dropped
    pub fn close(&self) {
        let inner = &self.handle.inner;
        if inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!(context = %inner.id, "Context closed");
    }
}

impl Drop for SharedContext {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedContext")
            .field("handle", &self.handle)
            .finish()
    }
}

/// Reference to a shared context held by the host or a swidget
#[derive(Clone)]
pub struct ContextHandle {
    inner: Arc<ContextInner>,
}

impl ContextHandle {
    /// Current snapshot
    pub fn get(&self) -> Arc<ContextSnapshot> {
        self.inner.current.load_full()
    }

    /// Current version
    pub fn version(&self) -> u64 {
        self.inner.current.load().version
    }

    /// Apply a mutation and notify subscribers
    ///
    /// Mutations that leave the fields unchanged do not bump the version and
    /// do not notify.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut ContextFields) -> R) -> Result<R> {
        self.inner.apply(None, mutate)
    }

    /// Apply a mutation only if the context is still at `expected_version`
    pub fn update_if<R>(
        &self,
        expected_version: u64,
        mutate: impl FnOnce(&mut ContextFields) -> R,
    ) -> Result<R> {
        self.inner.apply(Some(expected_version), mutate)
    }

    /// Set a single field
    pub fn set<K: Into<String>, V: Into<Value>>(&self, field: K, value: V) -> Result<()> {
        let field = field.into();
        let value = value.into();
        self.update(move |fields| {
            fields.insert(field, value);
        })
    }

    /// Register a callback run after every effective update
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ContextSnapshot) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);
        if !self.inner.closed.load(Ordering::Acquire) {
            self.inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((id, Arc::new(callback)));
        }
        Subscription {
            id,
            context: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True once the owner closed the context
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// True when both handles point at the same store
    pub fn same_context(&self, other: &ContextHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("id", &self.inner.id)
            .field("version", &self.version())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Live subscription; dropping it unsubscribes
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    context: Weak<ContextInner>,
}

impl Subscription {
    /// Unsubscribe explicitly
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.context.upgrade() {
            inner
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}
