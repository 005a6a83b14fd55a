//! Main entry point for Stash.
//!
//! This module provides the `Stash` struct, which owns one store and the
//! executor hosts use to run batches against it.

use crate::error::{Error, Result};
use stash_core::{ExecutionId, Scope, WorkflowId};
use stash_engine::{LimitPolicy, Scoped, Store, StoreConfig};
use stash_executor::{Executor, Invocation, ItemRecord};
use stash_storage::{Clock, RegistryStats, SweepReport};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A scoped in-process store.
///
/// Every `Stash` is independent: two instances never share partitions.
///
/// # Example
///
/// ```ignore
/// use stash::prelude::*;
///
/// let stash = Stash::new();
///
/// // Direct, typed access
/// let run = stash.execution("run-1", "checkout");
/// run.set("cart.total", 42.into(), SetMode::Always)?;
///
/// // Host-style batch of JSON items
/// let records = stash.execute_batch(
///     vec![json!({"operation": "increment", "scope": "workflow", "key": "runs"})],
///     &Invocation::new("run-1", "checkout"),
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct Stash {
    executor: Executor,
}

impl Stash {
    /// Store with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for store configuration.
    pub fn builder() -> StashBuilder {
        StashBuilder::new()
    }

    /// Store configured from a TOML file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::builder().config(StoreConfig::from_file(path)?).build())
    }

    /// The underlying store.
    pub fn store(&self) -> &Store {
        self.executor.store()
    }

    /// The executor used for batches.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Operations on the execution scope of a run.
    pub fn execution(&self, execution_id: &str, workflow_id: &str) -> Scoped<'_> {
        self.scope(Scope::Execution, execution_id, workflow_id)
    }

    /// Operations on the workflow scope shared by every run of `workflow_id`.
    pub fn workflow(&self, workflow_id: &str) -> Scoped<'_> {
        self.store().scope_key(Scope::Workflow, workflow_id)
    }

    /// Operations on the process-wide global scope.
    pub fn global(&self) -> Scoped<'_> {
        self.store().global()
    }

    /// Operations on any scope, resolved for a run.
    pub fn scope(&self, scope: Scope, execution_id: &str, workflow_id: &str) -> Scoped<'_> {
        self.store().scope(
            scope,
            &ExecutionId::from(execution_id),
            &WorkflowId::from(workflow_id),
        )
    }

    /// Run a batch of JSON items: sweep, then one record per item.
    pub fn execute_batch(
        &self,
        items: Vec<serde_json::Value>,
        invocation: &Invocation,
    ) -> Result<Vec<ItemRecord>> {
        Ok(self.executor.execute_batch(items, invocation)?)
    }

    /// Evict entries idle past the TTL.
    pub fn sweep(&self) -> SweepReport {
        self.store().sweep()
    }

    /// Entry counts and byte totals per partition.
    pub fn stats(&self) -> RegistryStats {
        self.store().stats()
    }
}

impl Default for Stash {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for store configuration.
///
/// # Example
///
/// ```ignore
/// // Short-lived entries, small values, warn instead of rejecting
/// let stash = Stash::builder()
///     .ttl(Duration::from_secs(60))
///     .max_value_bytes(64 * 1024)
///     .advisory_partition_limit()
///     .build();
///
/// // Deterministic time for tests
/// let clock = Arc::new(ManualClock::new(Timestamp::from_millis(0)));
/// let stash = Stash::builder().clock(clock.clone()).build();
/// ```
#[derive(Debug, Default)]
pub struct StashBuilder {
    config: StoreConfig,
    clock: Option<Arc<dyn Clock>>,
}

impl StashBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Idle time before execution/workflow entries are evicted.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl_ms = ttl.as_millis() as u64;
        self
    }

    /// Largest serialized value a single write may store.
    pub fn max_value_bytes(mut self, bytes: u64) -> Self {
        self.config.max_value_bytes = bytes;
        self
    }

    /// Largest aggregate serialized size of one partition.
    pub fn max_partition_bytes(mut self, bytes: u64) -> Self {
        self.config.max_partition_bytes = bytes;
        self
    }

    /// Log partition overruns instead of rejecting the write.
    pub fn advisory_partition_limit(mut self) -> Self {
        self.config.partition_limit = LimitPolicy::Advisory;
        self
    }

    /// Time source for entry timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and build the store.
    pub fn try_build(self) -> Result<Stash> {
        self.config.validate().map_err(Error::from)?;
        Ok(self.build())
    }

    /// Build the store.
    pub fn build(self) -> Stash {
        let store = match self.clock {
            Some(clock) => Store::with_clock(self.config, clock),
            None => Store::with_config(self.config),
        };
        Stash {
            executor: Executor::new(Arc::new(store)),
        }
    }
}
