//! Store Integration Test Suite
//!
//! Exercises the public `Stash` API end to end: scoped reads and writes,
//! conditional sets, isolation between runs, TTL eviction, size limits,
//! host batches and concurrent access.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test store
//!
//! # Run eviction tests only
//! cargo test --test store eviction::
//! ```

use std::sync::Arc;
use std::time::Duration;

use stash::{ManualClock, Timestamp};

pub use stash::prelude::*;

// Test modules
pub mod arrays;
pub mod basic_ops;
pub mod batch;
pub mod conditional;
pub mod counters;
pub mod eviction;
pub mod isolation;
pub mod limits;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Execution id used by single-run tests
pub const EXEC: &str = "exec-1";

/// Workflow id used by single-run tests
pub const WORKFLOW: &str = "wf-1";

/// Create a store with default settings
pub fn create_stash() -> Stash {
    Stash::new()
}

/// Create a store on a manual clock starting at t=0
pub fn create_stash_with_clock(ttl: Duration) -> (Stash, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Timestamp::from_millis(0)));
    let stash = Stash::builder().ttl(ttl).clock(clock.clone()).build();
    (stash, clock)
}
