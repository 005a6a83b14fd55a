//! Command execution layer for Stash
//!
//! Hosts drive the store through this crate. Each input item is decoded from
//! typed parameters into a [`Command`], executed against the shared
//! [`Store`](stash_engine::Store) and turned into an [`ItemRecord`].
//!
//! ```ignore
//! let executor = Executor::new(Arc::new(Store::new()));
//! let invocation = Invocation::new("run-42", "checkout").lenient(true);
//! let records = executor.execute_batch(items, &invocation)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod error;
mod executor;
mod output;
pub mod params;
mod record;

pub use command::Command;
pub use error::{Error, Result};
pub use executor::{Executor, Invocation};
pub use output::Output;
pub use params::{decode_value, ItemParams, SetValue, ValueType};
pub use record::{ItemRecord, UpdateRecord};
