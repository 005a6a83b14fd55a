//! Core types for Stash
//!
//! This crate holds everything the storage and engine layers share:
//!
//! - [`Value`] / [`Map`]: the tagged value tree stored in each scope
//! - [`Path`] and the path accessors ([`get_at_path`], [`set_at_path`],
//!   [`delete_at_path`])
//! - [`limits`]: serialized-size measurement and the per-value guard
//! - [`Scope`], [`ExecutionId`], [`WorkflowId`], [`SetMode`], [`Timestamp`]
//! - [`StashError`]: the error every store operation returns

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod path;
pub mod types;
pub mod value;

pub use error::{Result, StashError};
pub use path::{delete_at_path, get_at_path, get_at_path_mut, set_at_path, Path};
pub use types::{ExecutionId, Scope, SetMode, Timestamp, WorkflowId};
pub use value::{Map, Value};
