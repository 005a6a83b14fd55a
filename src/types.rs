//! Public types for the Stash API.
//!
//! This module re-exports types from the internal crates with one flat
//! namespace.

// Value tree and paths
pub use stash_core::{Map, Path, Value};

// Scopes and identifiers
pub use stash_core::{ExecutionId, Scope, SetMode, Timestamp, WorkflowId};

// Store handles and results
pub use stash_engine::{
    CounterUpdate, KeyUpdate, LimitPolicy, Popped, Scoped, StoreConfig, DEFAULT_TTL_MS,
};

// Time and eviction
pub use stash_storage::{Clock, ManualClock, PartitionStats, RegistryStats, SweepReport, SystemClock};

// Host batches
pub use stash_executor::{Command, Invocation, ItemRecord, Output};
