//! Idle-entry eviction
//!
//! There is no background thread. Callers run [`sweep`] opportunistically,
//! typically once per invocation before resolving a scope, so partitions
//! cannot grow without bound across many short-lived executions.
//!
//! Rules:
//! - execution and workflow entries idle for longer than the TTL are removed
//! - the global entry is never removed
//! - an entry whose tree is locked is in use and is kept

use crate::registry::{Partition, ScopeRegistry};
use serde::Serialize;
use stash_core::{Scope, Timestamp};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::debug;

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Execution entries removed
    pub evicted_executions: usize,
    /// Workflow entries removed
    pub evicted_workflows: usize,
    /// Bytes released from partition accounting
    pub freed_bytes: u64,
}

impl SweepReport {
    /// Total entries removed
    pub fn evicted(&self) -> usize {
        self.evicted_executions + self.evicted_workflows
    }
}

/// Evict every execution/workflow entry idle for longer than `ttl`.
pub fn sweep(registry: &ScopeRegistry, ttl: Duration) -> SweepReport {
    let now = registry.now();
    let ttl_ms = ttl.as_millis() as u64;

    let (evicted_executions, exec_bytes) =
        evict_idle(registry.partition(Scope::Execution), now, ttl_ms);
    let (evicted_workflows, wf_bytes) =
        evict_idle(registry.partition(Scope::Workflow), now, ttl_ms);

    let report = SweepReport {
        evicted_executions,
        evicted_workflows,
        freed_bytes: exec_bytes + wf_bytes,
    };
    if report.evicted() > 0 {
        debug!(
            evicted_executions,
            evicted_workflows,
            freed_bytes = report.freed_bytes,
            "swept idle scope entries"
        );
    }
    report
}

fn evict_idle(partition: &Partition, now: Timestamp, ttl_ms: u64) -> (usize, u64) {
    debug_assert!(partition.scope.is_evictable());

    let mut evicted = 0usize;
    let mut freed = 0u64;
    partition.entries.retain(|key, entry| {
        if entry.idle_millis(now) <= ttl_ms {
            return true;
        }
        let Some(_tree) = entry.try_lock() else {
            return true;
        };
        entry.mark_evicted();
        evicted += 1;
        freed += entry.bytes();
        debug!(scope = %partition.scope, key = key.as_str(), "evicting idle entry");
        false
    });
    if freed > 0 {
        partition.usage.fetch_sub(freed, Ordering::AcqRel);
    }
    (evicted, freed)
}

impl ScopeRegistry {
    /// Run [`sweep`] against this registry
    pub fn sweep(&self, ttl: Duration) -> SweepReport {
        sweep(self, ttl)
    }
}
