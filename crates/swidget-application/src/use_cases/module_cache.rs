//! Module cache
//!
//! One record per [`ModuleKey`], moving Pending → Ready | Failed once per
//! fetch attempt. Concurrent mounts of a key share a single in-flight fetch;
//! the fetch runs on its own task, so a caller that gives up does not cancel
//! it.
//!
//! ```text
//!            acquire (absent)            fetch ok
//!   ∅ ───────────────────────► Pending ───────────► Ready ◄─┐
//!                                 │  fetch failed            │ acquire: refCount+1
//!                                 ▼                          │
//!                              Failed ──acquire(retry)──► Pending
//! ```

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use swidget_domain::error::{Error, LoadFailure, LoadFailureKind, Result};
use swidget_domain::ports::{BundleEvaluator, BundleSource, EvaluatedModule};
use swidget_domain::value_objects::{ModuleKey, SwidgetMetadata};
use tracing::{debug, info, warn};

/// What happens to a record once its last mount is released
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Keep records for the process lifetime; only [`ModuleCache::evict`] and
    /// [`ModuleCache::clear`] remove them
    #[default]
    Persist,
    /// Drop a Ready record as soon as its refCount reaches 0
    EvictOnRelease,
}

/// Record state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    /// Fetch in flight
    Pending,
    /// Module evaluated and reusable
    Ready,
    /// Last fetch failed
    Failed,
}

/// Snapshot of a record for introspection
#[derive(Debug, Clone)]
pub struct ModuleRecordInfo {
    /// Record key
    pub key: ModuleKey,
    /// URL of the first (or retried) fetch
    pub url: String,
    /// Current state
    pub state: ModuleState,
    /// Live mounts plus in-flight requesters
    pub ref_count: usize,
    /// Fetches issued for this record
    pub fetch_count: usize,
    /// Failure of the last fetch, when Failed
    pub error: Option<LoadFailure>,
    /// Module metadata, when Ready
    pub metadata: Option<SwidgetMetadata>,
}

type LoadOutcome = std::result::Result<Arc<EvaluatedModule>, LoadFailure>;
type InFlight = Shared<BoxFuture<'static, LoadOutcome>>;

enum Slot {
    Pending(InFlight),
    Ready(Arc<EvaluatedModule>),
    Failed(LoadFailure),
}

impl Slot {
    fn state(&self) -> ModuleState {
        match self {
            Self::Pending(_) => ModuleState::Pending,
            Self::Ready(_) => ModuleState::Ready,
            Self::Failed(_) => ModuleState::Failed,
        }
    }
}

struct ModuleRecord {
    url: String,
    slot: Slot,
    ref_count: usize,
    fetch_count: usize,
    attempt: u64,
}

struct CacheInner {
    records: DashMap<ModuleKey, ModuleRecord>,
    source: Arc<dyn BundleSource>,
    evaluator: Arc<dyn BundleEvaluator>,
    policy: EvictionPolicy,
}

/// Per-key cache of evaluated swidget modules
///
/// Cheap to clone; clones share the same records.
#[derive(Clone)]
pub struct ModuleCache {
    inner: Arc<CacheInner>,
}

impl ModuleCache {
    /// Cache fetching through `source` and evaluating with `evaluator`
    pub fn new(source: Arc<dyn BundleSource>, evaluator: Arc<dyn BundleEvaluator>) -> Self {
        Self::with_policy(source, evaluator, EvictionPolicy::default())
    }

    /// Cache with an explicit eviction policy
    pub fn with_policy(
        source: Arc<dyn BundleSource>,
        evaluator: Arc<dyn BundleEvaluator>,
        policy: EvictionPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                records: DashMap::new(),
                source,
                evaluator,
                policy,
            }),
        }
    }

    /// Configured eviction policy
    pub fn policy(&self) -> EvictionPolicy {
        self.inner.policy
    }

    /// Take a reference on the module for `key`, loading it if needed
    ///
    /// The returned lease keeps the reference until dropped. If this future is
    /// dropped before completing, its reference is released while the fetch
    /// itself keeps running.
    pub async fn acquire(&self, key: &ModuleKey, url: &str, retry: bool) -> Result<ModuleLease> {
        let in_flight = match self.inner.records.entry(key.clone()) {
            Entry::Vacant(vacant) => {
                info!(module = %key.name, unique_id = %key.unique_id, url, "Loading swidget bundle");
                let in_flight = self.spawn_load(key.clone(), url.to_string(), 0);
                vacant.insert(ModuleRecord {
                    url: url.to_string(),
                    slot: Slot::Pending(in_flight.clone()),
                    ref_count: 1,
                    fetch_count: 1,
                    attempt: 0,
                });
                in_flight
            }
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if record.url != url {
                    warn!(
                        module = %key.name,
                        unique_id = %key.unique_id,
                        cached_url = %record.url,
                        url,
                        "Module already cached from another URL; reusing cached record"
                    );
                }
                match &record.slot {
                    Slot::Ready(module) => {
                        record.ref_count += 1;
                        debug!(module = %key, ref_count = record.ref_count, "Reusing cached module");
                        return Ok(ModuleLease::new(self.clone(), key.clone(), Arc::clone(module)));
                    }
                    Slot::Pending(in_flight) => {
                        record.ref_count += 1;
                        debug!(module = %key, "Attaching to in-flight load");
                        in_flight.clone()
                    }
                    Slot::Failed(failure) if !retry => {
                        debug!(module = %key, "Reporting cached load failure");
                        return Err(Error::RemoteLoad(failure.clone()));
                    }
                    Slot::Failed(_) => {
                        record.attempt += 1;
                        record.fetch_count += 1;
                        record.ref_count += 1;
                        info!(
                            module = %key.name,
                            unique_id = %key.unique_id,
                            url = %record.url,
                            attempt = record.attempt,
                            "Retrying failed swidget load"
                        );
                        let in_flight =
                            self.spawn_load(key.clone(), record.url.clone(), record.attempt);
                        record.slot = Slot::Pending(in_flight.clone());
                        in_flight
                    }
                }
            }
        };

        // Owns the reference taken above until the outcome is known.
        let reference = Reference {
            cache: self.clone(),
            key: key.clone(),
        };
        match in_flight.await {
            Ok(module) => Ok(ModuleLease {
                module,
                reference,
            }),
            Err(failure) => Err(Error::RemoteLoad(failure)),
        }
    }

    fn spawn_load(&self, key: ModuleKey, url: String, attempt: u64) -> InFlight {
        let inner = Arc::clone(&self.inner);
        let task_key = key.clone();
        let task_url = url.clone();
        let task = tokio::spawn(async move {
            let outcome = load(&inner, &task_key, &task_url).await;
            let orphaned = match inner.records.get_mut(&task_key) {
                Some(mut record) if record.attempt == attempt => {
                    record.slot = match &outcome {
                        Ok(module) => Slot::Ready(Arc::clone(module)),
                        Err(failure) => Slot::Failed(failure.clone()),
                    };
                    record.ref_count == 0 && outcome.is_ok()
                }
                _ => false,
            };
            // Every requester gave up while the fetch was in flight
            if orphaned && inner.policy == EvictionPolicy::EvictOnRelease {
                let evicted = inner
                    .records
                    .remove_if(&task_key, |_, record| {
                        record.ref_count == 0 && matches!(record.slot, Slot::Ready(_))
                    })
                    .is_some();
                if evicted {
                    debug!(module = %task_key, "Evicted unreferenced module after load");
                }
            }
            match &outcome {
                Ok(_) => info!(module = %task_key.name, unique_id = %task_key.unique_id, "Swidget module ready"),
                Err(failure) => warn!(module = %task_key.name, unique_id = %task_key.unique_id, error = %failure, "Swidget load failed"),
            }
            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(join) => Err(LoadFailure::new(
                    LoadFailureKind::ContractViolation,
                    url,
                    format!("bundle evaluation aborted: {join}"),
                )
                .with_key(key)),
            }
        }
        .boxed()
        .shared()
    }

    fn release(&self, key: &ModuleKey) {
        let evict = match self.inner.records.get_mut(key) {
            Some(mut record) => {
                record.ref_count = record.ref_count.saturating_sub(1);
                debug!(module = %key, ref_count = record.ref_count, "Released module reference");
                record.ref_count == 0
                    && self.inner.policy == EvictionPolicy::EvictOnRelease
                    && matches!(record.slot, Slot::Ready(_))
            }
            None => false,
        };
        if evict {
            self.remove_idle(key, |slot| matches!(slot, Slot::Ready(_)));
        }
    }

    fn remove_idle(&self, key: &ModuleKey, eligible: impl Fn(&Slot) -> bool) -> bool {
        let removed = self
            .inner
            .records
            .remove_if(key, |_, record| record.ref_count == 0 && eligible(&record.slot))
            .is_some();
        if removed {
            debug!(module = %key, "Evicted module record");
        }
        removed
    }

    /// Remove the record for `key` if nothing references it and no fetch is
    /// in flight
    pub fn evict(&self, key: &ModuleKey) -> bool {
        self.remove_idle(key, |slot| !matches!(slot, Slot::Pending(_)))
    }

    /// Remove every evictable record; returns how many were removed
    pub fn clear(&self) -> usize {
        self.keys()
            .iter()
            .filter(|key| self.evict(key))
            .count()
    }

    /// Snapshot of the record for `key`
    pub fn record(&self, key: &ModuleKey) -> Option<ModuleRecordInfo> {
        self.inner.records.get(key).map(|record| ModuleRecordInfo {
            key: key.clone(),
            url: record.url.clone(),
            state: record.slot.state(),
            ref_count: record.ref_count,
            fetch_count: record.fetch_count,
            error: match &record.slot {
                Slot::Failed(failure) => Some(failure.clone()),
                _ => None,
            },
            metadata: match &record.slot {
                Slot::Ready(module) => module.metadata(),
                _ => None,
            },
        })
    }

    /// Ready module for `key`, without taking a reference
    pub fn module(&self, key: &ModuleKey) -> Option<Arc<EvaluatedModule>> {
        self.inner
            .records
            .get(key)
            .and_then(|record| match &record.slot {
                Slot::Ready(module) => Some(Arc::clone(module)),
                _ => None,
            })
    }

    /// Cached keys, sorted
    pub fn keys(&self) -> Vec<ModuleKey> {
        let mut keys: Vec<ModuleKey> = self
            .inner
            .records
            .iter()
            .map(|record| record.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }
}

impl fmt::Debug for ModuleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleCache")
            .field("source", &self.inner.source.source_name())
            .field("policy", &self.inner.policy)
            .field("records", &self.inner.records.len())
            .finish()
    }
}

async fn load(inner: &CacheInner, key: &ModuleKey, url: &str) -> LoadOutcome {
    let bundle = inner
        .source
        .fetch(url)
        .await
        .map_err(|e| into_failure(e, LoadFailureKind::Network, key, url))?;
    inner
        .evaluator
        .evaluate(&bundle, &key.name)
        .map(Arc::new)
        .map_err(|e| into_failure(e, LoadFailureKind::ContractViolation, key, url))
}

fn into_failure(error: Error, kind: LoadFailureKind, key: &ModuleKey, url: &str) -> LoadFailure {
    match error {
        Error::RemoteLoad(failure) => failure.with_key(key.clone()),
        other => LoadFailure::new(kind, url, other.to_string()).with_key(key.clone()),
    }
}

/// One counted reference on a record, released on drop
struct Reference {
    cache: ModuleCache,
    key: ModuleKey,
}

impl Drop for Reference {
    fn drop(&mut self) {
        self.cache.release(&self.key);
    }
}

/// A counted reference on a Ready module
///
/// Dropping the lease decrements the record's refCount.
pub struct ModuleLease {
    module: Arc<EvaluatedModule>,
    reference: Reference,
}

impl ModuleLease {
    fn new(cache: ModuleCache, key: ModuleKey, module: Arc<EvaluatedModule>) -> Self {
        Self {
            module,
            reference: Reference { cache, key },
        }
    }

    /// The evaluated module
    pub fn module(&self) -> &Arc<EvaluatedModule> {
        &self.module
    }

    /// Key of the leased record
    pub fn key(&self) -> &ModuleKey {
        &self.reference.key
    }
}

impl fmt::Debug for ModuleLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLease")
            .field("key", &self.reference.key)
            .field("module", &self.module.manifest.name)
            .finish()
    }
}
