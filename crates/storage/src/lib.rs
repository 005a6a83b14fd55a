//! Storage layer for Stash
//!
//! This crate implements the in-memory partitions behind the store:
//! - [`StoreEntry`]: one scope's tree, access time and recorded size
//! - [`ScopeRegistry`]: execution, workflow and global partitions
//! - [`gc::sweep`]: TTL eviction of idle execution/workflow entries
//! - [`Clock`]: injectable time source

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod entry;
pub mod gc;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{SharedEntry, StoreEntry};
pub use gc::{sweep, SweepReport};
pub use registry::{PartitionStats, RegistryStats, ScopeGuard, ScopeHandle, ScopeRegistry};
