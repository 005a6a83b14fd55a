//! Store: mutation operations over scoped trees
//!
//! ## Design
//!
//! [`Store`] owns a [`ScopeRegistry`] and a [`StoreConfig`]. Operations go
//! through a [`Scoped`] view, obtained with [`Store::scope`], which pins one
//! resolved entry:
//!
//! ```ignore
//! let store = Store::new();
//! let run = store.scope(Scope::Execution, &exec, &wf);
//! run.set("user.name", "Ada".into(), SetMode::Always)?;
//! run.increment("user.visits", 1)?;
//! ```
//!
//! ## Thread Safety
//!
//! Every operation locks the entry's tree for its whole read-modify-write,
//! so increments and conditional sets on a shared workflow or global scope
//! are atomic with respect to each other.
//!
//! ## Size Accounting
//!
//! Every mutation computes the exact change in its tree's encoded size from
//! the slot it touches, and commits that delta to the entry and partition
//! before modifying anything. Growth that would take the partition past its
//! ceiling is refused at commit time, so a rejected write leaves no trace.
//! Only `clear` re-measures the tree.

use crate::config::{LimitPolicy, StoreConfig};
use stash_core::limits::{
    array_insert_delta, array_remove_delta, delete_delta, serialized_size, set_delta,
    validate_size,
};
use stash_core::{
    delete_at_path, get_at_path, get_at_path_mut, set_at_path, ExecutionId, Map, Path, Result,
    Scope, SetMode, StashError, Value, WorkflowId,
};
use stash_storage::{Clock, RegistryStats, ScopeGuard, ScopeHandle, ScopeRegistry, SweepReport};
use std::sync::Arc;
use tracing::{trace, warn};

// =============================================================================
// Results
// =============================================================================

/// Per-key result of a set
#[derive(Debug, Clone, PartialEq)]
pub struct KeyUpdate {
    /// Path as supplied
    pub key: String,
    /// Whether the value was stored (false when the mode skipped it)
    pub written: bool,
    /// Failure for this key, only populated in lenient batches
    pub error: Option<StashError>,
}

impl KeyUpdate {
    fn written(key: impl Into<String>, written: bool) -> Self {
        Self {
            key: key.into(),
            written,
            error: None,
        }
    }

    fn failed(key: impl Into<String>, error: StashError) -> Self {
        Self {
            key: key.into(),
            written: false,
            error: Some(error),
        }
    }
}

/// Counter value before and after an increment/decrement
#[derive(Debug, Clone, PartialEq)]
pub struct CounterUpdate {
    /// Previous value, after coercion to a number
    pub old: Value,
    /// Stored value
    pub new: Value,
}

/// Element removed by pop/shift
#[derive(Debug, Clone, PartialEq)]
pub struct Popped {
    /// Removed element, `Null` when the array was already empty
    pub value: Value,
    /// Array length after removal
    pub length: usize,
}

#[derive(Debug, Clone, Copy)]
enum End {
    Front,
    Back,
}

// =============================================================================
// Store
// =============================================================================

/// Scoped key-value tree store
#[derive(Debug, Default)]
pub struct Store {
    registry: ScopeRegistry,
    config: StoreConfig,
}

impl Store {
    /// Store with default configuration on the system clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            registry: ScopeRegistry::new(),
            config,
        }
    }

    /// Store on a caller-supplied clock
    pub fn with_clock(config: StoreConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: ScopeRegistry::with_clock(clock),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Underlying registry
    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    /// Evict entries idle past the configured TTL
    pub fn sweep(&self) -> SweepReport {
        self.registry.sweep(self.config.ttl())
    }

    /// Entry counts and byte totals per partition
    pub fn stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Resolve the entry for `scope`, creating it if needed
    pub fn scope(
        &self,
        scope: Scope,
        execution_id: &ExecutionId,
        workflow_id: &WorkflowId,
    ) -> Scoped<'_> {
        Scoped {
            store: self,
            handle: self.registry.resolve(scope, execution_id, workflow_id),
        }
    }

    /// Resolve by raw scope key (ignored for `Global`)
    pub fn scope_key(&self, scope: Scope, key: &str) -> Scoped<'_> {
        Scoped {
            store: self,
            handle: self.registry.resolve_key(scope, key),
        }
    }

    /// The process-wide global scope
    pub fn global(&self) -> Scoped<'_> {
        self.scope_key(Scope::Global, "")
    }
}

// =============================================================================
// Scoped
// =============================================================================

/// Operations against one resolved scope entry
#[derive(Debug, Clone)]
pub struct Scoped<'a> {
    store: &'a Store,
    handle: ScopeHandle,
}

impl Scoped<'_> {
    /// Scope of the pinned entry
    pub fn scope(&self) -> Scope {
        self.handle.scope()
    }

    /// The resolved handle, for direct access to the live tree
    pub fn handle(&self) -> &ScopeHandle {
        &self.handle
    }

    /// Lock the tree and stamp the access time
    fn lock(&self) -> ScopeGuard<'_> {
        let guard = self.handle.lock();
        self.handle.entry().touch(self.store.registry.now());
        guard
    }

    // ---- reads -------------------------------------------------------------

    /// Value at `path`, if any
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let path = Path::parse(path)?;
        let tree = self.lock();
        trace!(scope = %self.scope(), path = %path, "get");
        Ok(get_at_path(&tree, &path).cloned())
    }

    /// Whether anything is stored at `path`
    pub fn exists(&self, path: &str) -> Result<bool> {
        let path = Path::parse(path)?;
        let tree = self.lock();
        Ok(get_at_path(&tree, &path).is_some())
    }

    /// Copy of the whole tree.
    ///
    /// The result is a snapshot: later writes do not show up in it. Use
    /// [`Scoped::handle`] to lock the live tree.
    pub fn get_all(&self) -> Map {
        let tree = self.lock();
        Map::clone(&tree)
    }

    // ---- set ---------------------------------------------------------------

    /// Store `value` at `path` if `mode` allows it.
    ///
    /// Returns whether the value was written.
    pub fn set(&self, path: &str, value: Value, mode: SetMode) -> Result<bool> {
        let path = Path::parse(path)?;
        let mut tree = self.lock();
        self.write(&mut tree, &path, value, mode, &mut 0)
    }

    /// Assign several keys in order; later keys observe earlier writes.
    ///
    /// Strict (`lenient == false`): every path is validated before the first
    /// write, and a failure part way through restores the tree, so the batch
    /// applies completely or not at all. Values are size-checked only when
    /// their mode lets them be written, as with [`Scoped::set`].
    ///
    /// Lenient: each key is attempted independently and failures are
    /// reported in its [`KeyUpdate`].
    pub fn set_many(
        &self,
        entries: Vec<(String, Value)>,
        mode: SetMode,
        lenient: bool,
    ) -> Result<Vec<KeyUpdate>> {
        if lenient {
            Ok(self.set_many_lenient(entries, mode))
        } else {
            self.set_many_strict(entries, mode)
        }
    }

    fn set_many_strict(&self, entries: Vec<(String, Value)>, mode: SetMode) -> Result<Vec<KeyUpdate>> {
        let mut parsed = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let path = Path::parse(&key)?;
            parsed.push((key, path, value));
        }

        let mut tree = self.lock();
        let track = parsed.len() > 1;
        let mut undo = Undo::default();
        let mut applied = 0;
        let mut updates = Vec::with_capacity(parsed.len());
        for (key, path, value) in parsed {
            if track {
                undo.record(&tree, &path);
            }
            match self.write(&mut tree, &path, value, mode, &mut applied) {
                Ok(written) => updates.push(KeyUpdate::written(key, written)),
                Err(err) => {
                    undo.restore(&mut tree);
                    // The tree is back where it started. Without a ceiling
                    // the adjustment cannot be refused.
                    let _ = tree.adjust_size(-applied, None);
                    return Err(err);
                }
            }
        }
        Ok(updates)
    }

    fn set_many_lenient(&self, entries: Vec<(String, Value)>, mode: SetMode) -> Vec<KeyUpdate> {
        let mut tree = self.lock();
        let mut applied = 0;
        let mut updates = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let result = Path::parse(&key)
                .and_then(|path| self.write(&mut tree, &path, value, mode, &mut applied));
            updates.push(match result {
                Ok(written) => KeyUpdate::written(key, written),
                Err(err) => KeyUpdate::failed(key, err),
            });
        }
        updates
    }

    /// Guarded single write. Nothing is modified on error.
    ///
    /// `applied` accumulates the size deltas committed under the same lock,
    /// so a strict batch can give them back on rollback.
    fn write(
        &self,
        tree: &mut ScopeGuard<'_>,
        path: &Path,
        value: Value,
        mode: SetMode,
        applied: &mut i64,
    ) -> Result<bool> {
        if !mode.allows(get_at_path(tree, path).is_some()) {
            trace!(scope = %self.scope(), path = %path, mode = mode.as_str(), "set skipped");
            return Ok(false);
        }
        let size = validate_size(&value, path.as_str(), self.store.config.max_value_bytes)?;
        let delta = set_delta(tree, path, size);
        self.commit(tree, delta)?;

        set_at_path(tree, path, value);
        *applied += delta;
        trace!(scope = %self.scope(), path = %path, size, "set");
        Ok(true)
    }

    // ---- counters ----------------------------------------------------------

    /// Add `amount` to the number at `path`.
    ///
    /// A missing or non-numeric value counts as `0`. Two integers add as
    /// integers unless the sum overflows; anything else adds as floats.
    pub fn increment(&self, path: &str, amount: impl Into<Value>) -> Result<CounterUpdate> {
        let amount = numeric_amount(amount.into())?;
        self.add(path, amount)
    }

    /// Subtract `amount` from the number at `path`
    pub fn decrement(&self, path: &str, amount: impl Into<Value>) -> Result<CounterUpdate> {
        let amount = match numeric_amount(amount.into())? {
            Value::Int(i) => i
                .checked_neg()
                .map(Value::Int)
                .unwrap_or(Value::Float(-(i as f64))),
            Value::Float(f) => Value::Float(-f),
            other => other,
        };
        self.add(path, amount)
    }

    fn add(&self, path: &str, amount: Value) -> Result<CounterUpdate> {
        let path = Path::parse(path)?;
        let mut tree = self.lock();

        let old = match get_at_path(&tree, &path) {
            Some(Value::Int(i)) => Value::Int(*i),
            Some(Value::Float(f)) => Value::Float(*f),
            _ => Value::Int(0),
        };
        let new = add_numbers(&old, &amount);

        let delta = set_delta(&tree, &path, serialized_size(&new));
        self.commit(&mut tree, delta)?;

        set_at_path(&mut tree, &path, new.clone());
        trace!(scope = %self.scope(), path = %path, new = %new, "counter");
        Ok(CounterUpdate { old, new })
    }

    // ---- arrays ------------------------------------------------------------

    /// Append to the array at `path`, creating it when absent.
    ///
    /// Returns the new length.
    pub fn push(&self, path: &str, value: Value) -> Result<usize> {
        self.insert(path, value, End::Back)
    }

    /// Prepend to the array at `path`, creating it when absent
    pub fn unshift(&self, path: &str, value: Value) -> Result<usize> {
        self.insert(path, value, End::Front)
    }

    fn insert(&self, path: &str, value: Value, end: End) -> Result<usize> {
        let path = Path::parse(path)?;
        let size = validate_size(&value, path.as_str(), self.store.config.max_value_bytes)?;
        let mut tree = self.lock();

        let delta = match get_at_path(&tree, &path) {
            Some(Value::Array(items)) => signed(array_insert_delta(items, size)),
            Some(other) => {
                return Err(StashError::NotArray {
                    path: path.to_string(),
                    actual: other.type_name(),
                })
            }
            // `[value]`
            None => set_delta(&tree, &path, size + 2),
        };
        self.commit(&mut tree, delta)?;

        let length = match get_at_path_mut(&mut tree, &path) {
            Some(Value::Array(items)) => {
                match end {
                    End::Back => items.push(value),
                    End::Front => items.insert(0, value),
                }
                items.len()
            }
            _ => {
                set_at_path(&mut tree, &path, Value::Array(vec![value]));
                1
            }
        };
        Ok(length)
    }

    /// Remove and return the last element of the array at `path`
    pub fn pop(&self, path: &str) -> Result<Popped> {
        self.take(path, End::Back)
    }

    /// Remove and return the first element of the array at `path`
    pub fn shift(&self, path: &str) -> Result<Popped> {
        self.take(path, End::Front)
    }

    fn take(&self, path: &str, end: End) -> Result<Popped> {
        let path = Path::parse(path)?;
        let mut tree = self.lock();

        let (popped, freed) = match get_at_path_mut(&mut tree, &path) {
            None => {
                return Err(StashError::NotFound {
                    path: path.to_string(),
                })
            }
            Some(Value::Array(items)) => {
                let value = match end {
                    End::Back => items.pop(),
                    End::Front if items.is_empty() => None,
                    End::Front => Some(items.remove(0)),
                };
                let length = items.len();
                let freed = value
                    .as_ref()
                    .map_or(0, |v| array_remove_delta(v, length));
                let popped = Popped {
                    value: value.unwrap_or(Value::Null),
                    length,
                };
                (popped, freed)
            }
            Some(other) => {
                return Err(StashError::NotArray {
                    path: path.to_string(),
                    actual: other.type_name(),
                })
            }
        };
        tree.release_size(freed);
        Ok(popped)
    }

    // ---- removal -----------------------------------------------------------

    /// Delete the value at `path`. Returns whether anything was removed.
    pub fn remove(&self, path: &str) -> Result<bool> {
        let path = Path::parse(path)?;
        let mut tree = self.lock();
        let Some(freed) = delete_delta(&tree, &path) else {
            return Ok(false);
        };
        delete_at_path(&mut tree, &path);
        tree.release_size(freed);
        Ok(true)
    }

    /// Empty the whole tree, or remove a single path.
    ///
    /// Returns whether anything was removed.
    pub fn clear(&self, path: Option<&str>) -> Result<bool> {
        if let Some(path) = path {
            return self.remove(path);
        }
        let mut tree = self.lock();
        let had_data = !tree.is_empty();
        tree.clear();
        tree.refresh_size();
        trace!(scope = %self.scope(), "cleared scope");
        Ok(had_data)
    }

    // ---- limits ------------------------------------------------------------

    /// Commit a size change of `delta` bytes ahead of the mutation it
    /// describes.
    ///
    /// Under [`LimitPolicy::Enforce`] growth past the partition ceiling is
    /// refused and nothing is recorded.
    fn commit(&self, tree: &mut ScopeGuard<'_>, delta: i64) -> Result<()> {
        let config = &self.store.config;
        let limit = config.max_partition_bytes;
        let ceiling = match config.partition_limit {
            LimitPolicy::Enforce => Some(limit),
            LimitPolicy::Advisory => None,
        };
        match tree.adjust_size(delta, ceiling) {
            Ok(total) => {
                if delta > 0 && total > limit {
                    warn!(
                        scope = %tree.scope(),
                        size = total,
                        limit,
                        "partition over its size limit"
                    );
                }
                Ok(())
            }
            Err(projected) => Err(StashError::PartitionLimitExceeded {
                scope: tree.scope().as_str(),
                size: projected,
                limit,
            }),
        }
    }
}

fn signed(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}

fn numeric_amount(amount: Value) -> Result<Value> {
    match amount {
        Value::Int(_) | Value::Float(_) => Ok(amount),
        other => Err(StashError::invalid_parameter(
            "amount",
            format!("expected a number, got {}", other.type_name()),
        )),
    }
}

fn add_numbers(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_add(*y)
            .map(Value::Int)
            .unwrap_or(Value::Float(*x as f64 + *y as f64)),
        _ => Value::Float(a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0)),
    }
}

/// Snapshot of top-level keys touched by a strict batch, for rollback
#[derive(Default)]
struct Undo {
    saved: Vec<(String, Option<Value>)>,
}

impl Undo {
    fn record(&mut self, tree: &Map, path: &Path) {
        let Some(top) = path.segments().first() else {
            return;
        };
        if self.saved.iter().any(|(key, _)| key == top) {
            return;
        }
        self.saved.push((top.clone(), tree.get(top).cloned()));
    }

    fn restore(self, tree: &mut Map) {
        for (key, previous) in self.saved.into_iter().rev() {
            match previous {
                Some(value) => {
                    tree.insert(key, value);
                }
                None => {
                    tree.shift_remove(&key);
                }
            }
        }
    }
}
