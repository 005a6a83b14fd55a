//! Convenient imports for Stash.
//!
//! ```ignore
//! use stash::prelude::*;
//!
//! let stash = Stash::new();
//! stash.global().set("motd", "hello".into(), SetMode::Always)?;
//! ```

// Main entry point
pub use crate::database::{Stash, StashBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Core types
pub use crate::types::{Map, Scope, SetMode, Value};

// Batches
pub use crate::types::{Invocation, ItemRecord};

// Re-export serde_json for convenience
pub use serde_json::json;
