//! Size Limit Tests
//!
//! Per-value ceiling, and the partition ceiling under both policies.

use crate::*;

fn text(len: usize) -> Value {
    Value::String("x".repeat(len))
}

// =============================================================================
// PER-VALUE LIMIT
// =============================================================================

#[test]
fn test_oversized_value_rejected() {
    let stash = Stash::builder().max_value_bytes(16).build();
    let run = stash.execution(EXEC, WORKFLOW);

    let err = Error::from(run.set("k", text(20), SetMode::Always).unwrap_err());

    assert!(err.is_limit());
    assert!(!run.exists("k").unwrap());
}

#[test]
fn test_value_at_limit_accepted() {
    // 14 characters plus quotes
    let stash = Stash::builder().max_value_bytes(16).build();
    let run = stash.execution(EXEC, WORKFLOW);

    assert!(run.set("k", text(14), SetMode::Always).unwrap());
}

#[test]
fn test_oversized_push_rejected() {
    let stash = Stash::builder().max_value_bytes(16).build();
    let run = stash.execution(EXEC, WORKFLOW);

    run.push("q", 1.into()).unwrap();
    let err = Error::from(run.push("q", text(20)).unwrap_err());

    assert!(err.is_limit());
    assert_eq!(run.get("q").unwrap(), Some(Value::from(json!([1]))));
}

#[test]
fn test_skipped_write_is_not_size_checked() {
    let stash = Stash::builder().max_value_bytes(16).build();
    let run = stash.execution(EXEC, WORKFLOW);
    run.set("k", 1.into(), SetMode::Always).unwrap();

    // Direct and batched sets agree: the mode skips before the size matters
    assert!(!run.set("k", text(20), SetMode::IfAbsent).unwrap());
    let records = stash
        .execute_batch(
            vec![json!({
                "operation": "set",
                "key": "k",
                "value": "x".repeat(20),
                "mode": "ifAbsent"
            })],
            &Invocation::new(EXEC, WORKFLOW),
        )
        .unwrap();

    assert!(records[0].success);
    assert_eq!(run.get("k").unwrap(), Some(Value::Int(1)));
}

// =============================================================================
// PARTITION LIMIT
// =============================================================================

#[test]
fn test_partition_limit_spans_entries() {
    let stash = Stash::builder().max_partition_bytes(70).build();

    stash
        .execution("run-a", WORKFLOW)
        .set("k", text(32), SetMode::Always)
        .unwrap();
    let err = stash
        .execution("run-b", WORKFLOW)
        .set("k", text(32), SetMode::Always)
        .unwrap_err();

    assert!(Error::from(err).is_limit());
    assert_eq!(stash.execution("run-b", WORKFLOW).get("k").unwrap(), None);
}

#[test]
fn test_partitions_are_budgeted_separately() {
    let stash = Stash::builder().max_partition_bytes(70).build();

    stash
        .execution(EXEC, WORKFLOW)
        .set("k", text(32), SetMode::Always)
        .unwrap();

    assert!(stash
        .workflow(WORKFLOW)
        .set("k", text(32), SetMode::Always)
        .unwrap());
}

#[test]
fn test_advisory_limit_allows_overrun() {
    let stash = Stash::builder()
        .max_partition_bytes(70)
        .advisory_partition_limit()
        .build();

    for run in ["run-a", "run-b"] {
        assert!(stash
            .execution(run, WORKFLOW)
            .set("k", text(32), SetMode::Always)
            .unwrap());
    }

    assert!(stash.stats().execution.bytes > 70);
}

#[test]
fn test_overwrite_releases_old_size() {
    let stash = Stash::builder().max_partition_bytes(70).build();
    let run = stash.execution(EXEC, WORKFLOW);

    // Replacing a value only counts the difference
    run.set("k", text(32), SetMode::Always).unwrap();
    run.set("k", text(32), SetMode::Always).unwrap();
    run.set("k", text(2), SetMode::Always).unwrap();

    assert!(stash.stats().execution.bytes < 20);
}

#[test]
fn test_invalid_config_rejected() {
    let err = Stash::builder().max_value_bytes(0).try_build().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
