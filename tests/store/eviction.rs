//! TTL Eviction Tests
//!
//! Entries idle for longer than the TTL are dropped by a sweep. Any access
//! refreshes the idle timer, and the global entry never expires.

use crate::*;
use std::time::Duration;

const TTL: Duration = Duration::from_millis(1_000);

#[test]
fn test_idle_exactly_ttl_is_kept() {
    let (stash, clock) = create_stash_with_clock(TTL);
    stash
        .execution(EXEC, WORKFLOW)
        .set("k", 1.into(), SetMode::Always)
        .unwrap();

    clock.advance(TTL);
    assert_eq!(stash.sweep().evicted(), 0);

    clock.advance(Duration::from_millis(1));
    let report = stash.sweep();
    assert_eq!(report.evicted_executions, 1);
    assert!(report.freed_bytes > 0);
}

#[test]
fn test_evicted_scope_starts_empty() {
    let (stash, clock) = create_stash_with_clock(TTL);
    stash
        .execution(EXEC, WORKFLOW)
        .set("k", 1.into(), SetMode::Always)
        .unwrap();

    clock.advance(TTL * 2);
    stash.sweep();

    assert_eq!(stash.execution(EXEC, WORKFLOW).get("k").unwrap(), None);
}

#[test]
fn test_reads_refresh_idle_timer() {
    let (stash, clock) = create_stash_with_clock(TTL);
    stash
        .workflow(WORKFLOW)
        .set("k", 1.into(), SetMode::Always)
        .unwrap();

    clock.advance(Duration::from_millis(800));
    assert!(stash.workflow(WORKFLOW).exists("k").unwrap());

    clock.advance(Duration::from_millis(800));
    assert_eq!(stash.sweep().evicted(), 0);
    assert_eq!(stash.workflow(WORKFLOW).get("k").unwrap(), Some(Value::Int(1)));
}

#[test]
fn test_global_never_expires() {
    let (stash, clock) = create_stash_with_clock(TTL);
    stash.global().set("k", 1.into(), SetMode::Always).unwrap();

    clock.advance(TTL * 100);
    stash.sweep();

    assert_eq!(stash.global().get("k").unwrap(), Some(Value::Int(1)));
    assert_eq!(stash.stats().global.entries, 1);
}

#[test]
fn test_only_idle_entries_evicted() {
    let (stash, clock) = create_stash_with_clock(TTL);
    stash
        .execution("old", WORKFLOW)
        .set("k", 1.into(), SetMode::Always)
        .unwrap();

    clock.advance(Duration::from_millis(900));
    stash
        .execution("fresh", WORKFLOW)
        .set("k", 2.into(), SetMode::Always)
        .unwrap();

    clock.advance(Duration::from_millis(200));
    let report = stash.sweep();

    assert_eq!(report.evicted_executions, 1);
    assert_eq!(stash.stats().execution.entries, 1);
    assert_eq!(stash.execution("fresh", WORKFLOW).get("k").unwrap(), Some(Value::Int(2)));
}

#[test]
fn test_batch_sweeps_before_running() {
    let (stash, clock) = create_stash_with_clock(TTL);
    stash
        .execution("stale", WORKFLOW)
        .set("k", 1.into(), SetMode::Always)
        .unwrap();

    clock.advance(TTL * 2);
    stash
        .execute_batch(
            vec![json!({"operation": "set", "key": "k", "value": "v"})],
            &Invocation::new(EXEC, WORKFLOW),
        )
        .unwrap();

    let stats = stash.stats();
    assert_eq!(stats.execution.entries, 1);
    assert_eq!(stash.execution(EXEC, WORKFLOW).get("k").unwrap(), Some(Value::from("v")));
}
