//! Command dispatch and batch processing
//!
//! The [`Executor`] is the single entry point for running store operations
//! on behalf of a host:
//!
//! - [`Executor::execute`] runs one [`Command`] for an [`Invocation`]
//! - [`Executor::execute_batch`] runs a list of JSON items, producing one
//!   [`ItemRecord`] per item
//!
//! Idle entries are swept before every single command and once at the start
//! of a batch, so hosts and interactive sessions evict the same way. A batch
//! then processes items strictly in order. In strict mode the first failure aborts the batch and is returned
//! with the item's index. In lenient mode the failure becomes a soft record
//! and processing continues.

use crate::command::Command;
use crate::error::{Error, Result};
use crate::output::Output;
use crate::params::ItemParams;
use crate::record::ItemRecord;
use stash_core::{ExecutionId, Scope, WorkflowId};
use stash_engine::Store;
use std::sync::Arc;
use tracing::{debug, trace};

/// Identity and policy of one host invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Current run
    pub execution_id: ExecutionId,
    /// Workflow the run belongs to
    pub workflow_id: WorkflowId,
    /// Turn per-item failures into soft records instead of aborting
    pub lenient: bool,
}

impl Invocation {
    /// Strict invocation for the given run
    pub fn new(execution_id: impl Into<ExecutionId>, workflow_id: impl Into<WorkflowId>) -> Self {
        Self {
            execution_id: execution_id.into(),
            workflow_id: workflow_id.into(),
            lenient: false,
        }
    }

    /// Set lenient mode
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }
}

/// Runs commands against a shared [`Store`]
#[derive(Debug, Clone)]
pub struct Executor {
    store: Arc<Store>,
}

impl Executor {
    /// Executor over `store`
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Run a single command.
    ///
    /// Idle entries are swept first; `sweep` and `stats` skip that step so
    /// they report the store as it stands. Batched sets honour
    /// `invocation.lenient`: strict sets apply all keys or none, lenient
    /// sets report failures per key.
    pub fn execute(&self, command: Command, invocation: &Invocation) -> Result<Output> {
        if !matches!(command, Command::Sweep | Command::Stats) {
            let report = self.store.sweep();
            if report.evicted() > 0 {
                debug!(evicted = report.evicted(), op = command.name(), "swept before command");
            }
        }
        self.dispatch(command, invocation)
    }

    fn dispatch(&self, command: Command, invocation: &Invocation) -> Result<Output> {
        trace!(op = command.name(), "execute");
        let output = match command {
            Command::Stats => Output::Stats(self.store.stats()),
            Command::Sweep => Output::Swept(self.store.sweep()),
            Command::Set {
                scope,
                entries,
                mode,
            } => {
                let updates = self
                    .scoped(scope, invocation)
                    .set_many(entries, mode, invocation.lenient)?;
                Output::Updated(updates)
            }
            Command::Get { scope, key } => {
                let value = self.scoped(scope, invocation).get(&key)?;
                Output::Fetched {
                    name: last_segment(&key).to_string(),
                    value,
                }
            }
            Command::GetAll { scope } => Output::Tree(self.scoped(scope, invocation).get_all()),
            Command::Exists { scope, key } => {
                Output::Exists(self.scoped(scope, invocation).exists(&key)?)
            }
            Command::Increment { scope, key, amount } => {
                Output::Counter(self.scoped(scope, invocation).increment(&key, amount)?)
            }
            Command::Decrement { scope, key, amount } => {
                Output::Counter(self.scoped(scope, invocation).decrement(&key, amount)?)
            }
            Command::Push { scope, key, value } => {
                Output::Length(self.scoped(scope, invocation).push(&key, value)?)
            }
            Command::Unshift { scope, key, value } => {
                Output::Length(self.scoped(scope, invocation).unshift(&key, value)?)
            }
            Command::Pop { scope, key } => Output::Popped(self.scoped(scope, invocation).pop(&key)?),
            Command::Shift { scope, key } => {
                Output::Popped(self.scoped(scope, invocation).shift(&key)?)
            }
            Command::Remove { scope, key } => {
                Output::Removed(self.scoped(scope, invocation).remove(&key)?)
            }
            Command::Clear { scope, key } => {
                Output::Cleared(self.scoped(scope, invocation).clear(key.as_deref())?)
            }
        };
        Ok(output)
    }

    /// Run a batch of JSON items.
    ///
    /// Sweeps idle entries first, then handles each item in order.
    pub fn execute_batch(
        &self,
        items: Vec<serde_json::Value>,
        invocation: &Invocation,
    ) -> Result<Vec<ItemRecord>> {
        let report = self.store.sweep();
        debug!(
            items = items.len(),
            evicted = report.evicted(),
            lenient = invocation.lenient,
            execution_id = %invocation.execution_id,
            "executing batch"
        );

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let (op, scope, result) = self.execute_item(item, invocation);
            match result {
                Ok(output) => records.push(ItemRecord::from_output(&op, scope, output)),
                Err(err) if invocation.lenient => {
                    debug!(index, op = op.as_str(), error = %err, "item failed");
                    records.push(ItemRecord::failure(&op, scope, &err));
                }
                Err(err) => {
                    return Err(Error::ItemFailed {
                        index,
                        source: Box::new(err),
                    })
                }
            }
        }
        Ok(records)
    }

    /// Decode and run one item, keeping whatever was learned about it for
    /// the record even when decoding fails part way.
    fn execute_item(
        &self,
        item: serde_json::Value,
        invocation: &Invocation,
    ) -> (String, Option<Scope>, Result<Output>) {
        let params = match ItemParams::from_json(item) {
            Ok(params) => params,
            Err(err) => return (String::new(), None, Err(err)),
        };
        let op = params.operation().to_string();
        let scope = params.scope().ok();
        let result = params
            .into_command()
            .and_then(|command| self.dispatch(command, invocation));
        let scope = match op.as_str() {
            "stats" | "sweep" => None,
            _ => scope,
        };
        (op, scope, result)
    }

    fn scoped(&self, scope: Scope, invocation: &Invocation) -> stash_engine::Scoped<'_> {
        self.store
            .scope(scope, &invocation.execution_id, &invocation.workflow_id)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
