//! Store engine for Stash
//!
//! - [`Store`]: owns the scope registry and configuration
//! - [`Scoped`]: set/get/counter/array/removal operations on one scope entry
//! - [`StoreConfig`]: TTL and size ceilings, loadable from TOML

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod store;

pub use config::{ConfigError, LimitPolicy, StoreConfig, StoreConfigBuilder, DEFAULT_TTL_MS};
pub use store::{CounterUpdate, KeyUpdate, Popped, Scoped, Store};
