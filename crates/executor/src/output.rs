//! Results produced by the [`Executor`](crate::Executor)

use stash_core::{Map, Value};
use stash_engine::{CounterUpdate, KeyUpdate, Popped};
use stash_storage::{RegistryStats, SweepReport};

/// Typed result of a [`Command`](crate::Command)
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Per-key set results
    Updated(Vec<KeyUpdate>),
    /// Value read from a path
    Fetched {
        /// Final path segment, used to label scalar values
        name: String,
        /// Value found, if any
        value: Option<Value>,
    },
    /// Result of an existence test
    Exists(bool),
    /// Snapshot of a whole scope tree
    Tree(Map),
    /// Counter before and after
    Counter(CounterUpdate),
    /// Array length after an insert
    Length(usize),
    /// Element removed from an array
    Popped(Popped),
    /// Whether a remove deleted anything
    Removed(bool),
    /// Whether a clear deleted anything
    Cleared(bool),
    /// Partition statistics
    Stats(RegistryStats),
    /// Sweep outcome
    Swept(SweepReport),
}
