//! # Stash
//!
//! Transient in-process key/value store for workflow executions.
//!
//! Stash keeps three partitions of JSON-like trees, addressed by dot paths:
//!
//! - **execution**: private to one run, keyed by execution id
//! - **workflow**: shared by every run of a workflow, keyed by workflow id
//! - **global**: one tree for the whole process
//!
//! Execution and workflow entries are evicted once they sit idle longer than
//! the configured TTL. The global entry is never evicted.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stash::prelude::*;
//!
//! let stash = Stash::new();
//!
//! // Typed access to one scope
//! let run = stash.execution("run-1", "checkout");
//! run.set("user.name", "Alice".into(), SetMode::Always)?;
//! run.push("events", "login".into())?;
//!
//! // Counters shared across runs
//! stash.workflow("checkout").increment("runs", 1)?;
//!
//! // Host-style JSON items, one record each
//! let records = stash.execute_batch(
//!     vec![json!({"operation": "get", "scope": "execution", "key": "user.name"})],
//!     &Invocation::new("run-1", "checkout"),
//! )?;
//! ```
//!
//! ## Limits
//!
//! A single value may serialize to at most 10 MiB and a partition to at most
//! 100 MiB. Both ceilings are configurable through [`StashBuilder`] or a TOML
//! file read by [`Stash::from_config_file`].

#![warn(missing_docs)]

mod database;
mod error;
mod types;

pub mod prelude;

// Re-export main entry points
pub use database::{Stash, StashBuilder};
pub use error::{Error, Result};

// Re-export types
pub use types::*;
