//! Scope registry: the three partitions of the store
//!
//! # Design
//!
//! - DashMap per partition: sharded, so different scope keys rarely contend
//! - FxHash: fast non-crypto hash for host-supplied identifiers
//! - One entry per scope key, created lazily on first touch
//! - The global partition holds a single entry created with the registry
//!
//! # Thread Safety
//!
//! `resolve()` creates and stamps an entry while holding the partition shard
//! lock. The sweeper evicts under the same shard lock, so an entry that was
//! just resolved is never evicted before its caller gets to use it.
//!
//! Registries are plain owned values. Each [`ScopeRegistry`] is fully
//! independent, which is what lets tests build isolated stores.

use crate::clock::{Clock, SystemClock};
use crate::entry::{SharedEntry, StoreEntry};
use dashmap::DashMap;
use parking_lot::MutexGuard;
use rustc_hash::FxHasher;
use serde::Serialize;
use stash_core::limits::tree_size;
use stash_core::{ExecutionId, Map, Scope, Timestamp, WorkflowId};
use std::hash::BuildHasherDefault;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Key of the single entry in the global partition
const GLOBAL_KEY: &str = "";

/// One partition: scope key → entry, plus its aggregate byte usage
#[derive(Debug)]
pub(crate) struct Partition {
    pub(crate) scope: Scope,
    pub(crate) entries: DashMap<String, SharedEntry, FxBuildHasher>,
    pub(crate) usage: Arc<AtomicU64>,
}

impl Partition {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            entries: DashMap::with_hasher(FxBuildHasher::default()),
            usage: Arc::new(AtomicU64::new(0)),
        }
    }

    fn resolve(&self, key: &str, now: Timestamp) -> SharedEntry {
        let guard = self.entries.entry(key.to_string()).or_insert_with(|| {
            trace!(scope = %self.scope, key, "creating scope entry");
            let entry = Arc::new(StoreEntry::new(now));
            self.usage.fetch_add(entry.bytes(), Ordering::AcqRel);
            entry
        });
        // Stamp while the shard lock is held
        guard.touch(now);
        Arc::clone(guard.value())
    }

    pub(crate) fn bytes(&self) -> u64 {
        self.usage.load(Ordering::Acquire)
    }

    fn stats(&self) -> PartitionStats {
        PartitionStats {
            entries: self.entries.len(),
            bytes: self.bytes(),
        }
    }
}

/// Entry counts and byte usage of one partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    /// Number of live entries
    pub entries: usize,
    /// Sum of recorded entry sizes in bytes
    pub bytes: u64,
}

/// Stats for all three partitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Per-execution partition
    pub execution: PartitionStats,
    /// Per-workflow partition
    pub workflow: PartitionStats,
    /// Global partition
    pub global: PartitionStats,
}

/// Owner of the execution, workflow and global partitions
#[derive(Debug)]
pub struct ScopeRegistry {
    execution: Partition,
    workflow: Partition,
    global: Partition,
    clock: Arc<dyn Clock>,
}

impl ScopeRegistry {
    /// Registry on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Registry on a caller-supplied clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let registry = Self {
            execution: Partition::new(Scope::Execution),
            workflow: Partition::new(Scope::Workflow),
            global: Partition::new(Scope::Global),
            clock,
        };
        // The global entry lives as long as the registry
        registry.global.resolve(GLOBAL_KEY, registry.clock.now());
        registry
    }

    /// Current time according to the registry clock
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub(crate) fn partition(&self, scope: Scope) -> &Partition {
        match scope {
            Scope::Execution => &self.execution,
            Scope::Workflow => &self.workflow,
            Scope::Global => &self.global,
        }
    }

    /// Resolve the entry for `scope`, creating it if needed.
    ///
    /// - `Execution` → keyed by `execution_id`
    /// - `Workflow` → keyed by `workflow_id`
    /// - `Global` → the single global entry
    ///
    /// The entry's access time is refreshed on every call.
    pub fn resolve(
        &self,
        scope: Scope,
        execution_id: &ExecutionId,
        workflow_id: &WorkflowId,
    ) -> ScopeHandle {
        let key = match scope {
            Scope::Execution => execution_id.as_str(),
            Scope::Workflow => workflow_id.as_str(),
            Scope::Global => GLOBAL_KEY,
        };
        self.resolve_key(scope, key)
    }

    /// Resolve by raw scope key. The key is ignored for `Global`.
    pub fn resolve_key(&self, scope: Scope, key: &str) -> ScopeHandle {
        let key = if scope == Scope::Global { GLOBAL_KEY } else { key };
        let partition = self.partition(scope);
        let entry = partition.resolve(key, self.clock.now());
        ScopeHandle {
            scope,
            key: key.to_string(),
            entry,
            usage: Arc::clone(&partition.usage),
        }
    }

    /// Handle to an existing entry, without creating or touching it
    pub fn peek(&self, scope: Scope, key: &str) -> Option<ScopeHandle> {
        let key = if scope == Scope::Global { GLOBAL_KEY } else { key };
        let partition = self.partition(scope);
        let entry = partition.entries.get(key).map(|e| Arc::clone(e.value()))?;
        Some(ScopeHandle {
            scope,
            key: key.to_string(),
            entry,
            usage: Arc::clone(&partition.usage),
        })
    }

    /// Whether an entry exists, without creating or touching it
    pub fn contains(&self, scope: Scope, key: &str) -> bool {
        let key = if scope == Scope::Global { GLOBAL_KEY } else { key };
        self.partition(scope).entries.contains_key(key)
    }

    /// Last access time of an entry, without touching it
    pub fn last_touched(&self, scope: Scope, key: &str) -> Option<Timestamp> {
        let key = if scope == Scope::Global { GLOBAL_KEY } else { key };
        self.partition(scope)
            .entries
            .get(key)
            .map(|entry| entry.last_touched())
    }

    /// Number of entries in a partition
    pub fn len(&self, scope: Scope) -> usize {
        self.partition(scope).entries.len()
    }

    /// Whether the execution and workflow partitions are both empty
    pub fn is_empty(&self) -> bool {
        self.execution.entries.is_empty() && self.workflow.entries.is_empty()
    }

    /// Aggregate byte usage of a partition
    pub fn partition_bytes(&self, scope: Scope) -> u64 {
        self.partition(scope).bytes()
    }

    /// Entry counts and byte usage for every partition
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            execution: self.execution.stats(),
            workflow: self.workflow.stats(),
            global: self.global.stats(),
        }
    }
}

impl Default for ScopeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved scope entry
///
/// Handles are meant to be short-lived: resolve, operate, drop. The sweeper
/// may evict an entry whose handle is held idle past the TTL; writes through
/// such a handle no longer count toward the partition.
#[derive(Debug, Clone)]
pub struct ScopeHandle {
    scope: Scope,
    key: String,
    entry: SharedEntry,
    usage: Arc<AtomicU64>,
}

impl ScopeHandle {
    /// Scope this handle belongs to
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Scope key (empty for global)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying entry
    pub fn entry(&self) -> &SharedEntry {
        &self.entry
    }

    /// Lock the scope tree
    pub fn lock(&self) -> ScopeGuard<'_> {
        ScopeGuard {
            handle: self,
            tree: self.entry.lock(),
        }
    }
}

/// Exclusive access to a scope tree
///
/// Dereferences to the tree. Mutations report their size change through
/// [`ScopeGuard::adjust_size`] before they are applied; wholesale rewrites
/// use [`ScopeGuard::refresh_size`] afterwards.
pub struct ScopeGuard<'a> {
    handle: &'a ScopeHandle,
    tree: MutexGuard<'a, Map>,
}

impl ScopeGuard<'_> {
    /// Scope of the locked entry
    pub fn scope(&self) -> Scope {
        self.handle.scope
    }

    /// Recorded size of this entry
    pub fn entry_bytes(&self) -> u64 {
        self.handle.entry.bytes()
    }

    /// Aggregate recorded size of the partition
    pub fn partition_bytes(&self) -> u64 {
        self.handle.usage.load(Ordering::Acquire)
    }

    /// Apply a size change of `delta` bytes to the entry and its partition.
    ///
    /// Growth is reserved in the partition with a compare-and-swap, so
    /// concurrent writers to different entries of one partition can never
    /// jointly pass `ceiling`. When the reservation would exceed it, nothing
    /// is recorded and the projected partition size is returned as the error.
    ///
    /// Returns the partition size after the change.
    pub fn adjust_size(&mut self, delta: i64, ceiling: Option<u64>) -> Result<u64, u64> {
        let entry = &self.handle.entry;
        let usage = &self.handle.usage;
        // An evicted entry no longer counts toward its partition
        if delta == 0 || entry.is_evicted() {
            entry.adjust_bytes(delta);
            return Ok(usage.load(Ordering::Acquire));
        }

        let amount = delta.unsigned_abs();
        if delta < 0 {
            entry.adjust_bytes(delta);
            let previous = usage.fetch_sub(amount, Ordering::AcqRel);
            return Ok(previous.saturating_sub(amount));
        }

        let reserved = usage.fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
            let projected = current.saturating_add(amount);
            match ceiling {
                Some(limit) if projected > limit => None,
                _ => Some(projected),
            }
        });
        match reserved {
            Ok(previous) => {
                entry.adjust_bytes(delta);
                Ok(previous.saturating_add(amount))
            }
            Err(current) => Err(current.saturating_add(amount)),
        }
    }

    /// Record that `bytes` were removed from the tree
    pub fn release_size(&mut self, bytes: u64) {
        let delta = i64::try_from(bytes).map_or(i64::MIN, |b| -b);
        // Shrinking is never refused
        let _ = self.adjust_size(delta, None);
    }

    /// Re-measure the whole tree and update entry and partition sizes.
    ///
    /// Returns the new entry size.
    pub fn refresh_size(&mut self) -> u64 {
        let bytes = tree_size(&self.tree);
        let old = self.handle.entry.swap_bytes(bytes);
        if !self.handle.entry.is_evicted() {
            if bytes >= old {
                self.handle.usage.fetch_add(bytes - old, Ordering::AcqRel);
            } else {
                self.handle.usage.fetch_sub(old - bytes, Ordering::AcqRel);
            }
        }
        bytes
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = Map;

    fn deref(&self) -> &Map {
        &self.tree
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Map {
        &mut self.tree
    }
}
