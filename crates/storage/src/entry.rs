//! Per-scope store entry
//!
//! A [`StoreEntry`] owns one scope's tree. The tree sits behind a mutex so a
//! read-modify-write (increment, conditional set, pop) runs as one critical
//! section. The timestamp and byte size live outside the mutex so the sweeper
//! and the registry can read them without waiting on an in-flight operation.

use parking_lot::{Mutex, MutexGuard};
use stash_core::limits::tree_size;
use stash_core::{Map, Timestamp};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Entry shared between the registry and callers
pub type SharedEntry = Arc<StoreEntry>;

/// One scope's data plus bookkeeping
#[derive(Debug)]
pub struct StoreEntry {
    data: Mutex<Map>,
    /// Last access, milliseconds since epoch
    last_touched: AtomicU64,
    /// Serialized size of `data` as last recorded
    bytes: AtomicU64,
    /// Set once the sweeper has dropped this entry from its partition
    evicted: AtomicBool,
}

impl StoreEntry {
    /// New empty entry touched at `now`
    pub fn new(now: Timestamp) -> Self {
        let data = Map::new();
        let bytes = tree_size(&data);
        Self {
            data: Mutex::new(data),
            last_touched: AtomicU64::new(now.as_millis()),
            bytes: AtomicU64::new(bytes),
            evicted: AtomicBool::new(false),
        }
    }

    /// Refresh the access time.
    ///
    /// Never moves the timestamp backwards, even if clocks disagree.
    pub fn touch(&self, now: Timestamp) {
        self.last_touched
            .fetch_max(now.as_millis(), Ordering::AcqRel);
    }

    /// Last access time
    pub fn last_touched(&self) -> Timestamp {
        Timestamp::from_millis(self.last_touched.load(Ordering::Acquire))
    }

    /// Lock the tree for reading or mutation
    pub fn lock(&self) -> MutexGuard<'_, Map> {
        self.data.lock()
    }

    /// Lock the tree only if nobody else holds it
    pub fn try_lock(&self) -> Option<MutexGuard<'_, Map>> {
        self.data.try_lock()
    }

    /// Recorded serialized size of the tree
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Acquire)
    }

    /// Store a new size, returning the previous one
    pub(crate) fn swap_bytes(&self, bytes: u64) -> u64 {
        self.bytes.swap(bytes, Ordering::AcqRel)
    }

    /// Grow or shrink the recorded size
    pub(crate) fn adjust_bytes(&self, delta: i64) {
        let amount = delta.unsigned_abs();
        if delta >= 0 {
            self.bytes.fetch_add(amount, Ordering::AcqRel);
        } else {
            self.bytes.fetch_sub(amount, Ordering::AcqRel);
        }
    }

    /// Whether the sweeper has removed this entry
    pub fn is_evicted(&self) -> bool {
        self.evicted.load(Ordering::Acquire)
    }

    pub(crate) fn mark_evicted(&self) {
        self.evicted.store(true, Ordering::Release);
    }

    /// Idle time relative to `now`
    pub fn idle_millis(&self, now: Timestamp) -> u64 {
        now.millis_since(self.last_touched())
    }
}
