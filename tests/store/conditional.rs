//! Conditional Set Tests
//!
//! ifAbsent / ifPresent write modes.

use crate::*;

#[test]
fn test_if_absent_writes_once() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    assert!(run.set("lock", "first".into(), SetMode::IfAbsent).unwrap());
    assert!(!run.set("lock", "second".into(), SetMode::IfAbsent).unwrap());

    assert_eq!(run.get("lock").unwrap(), Some(Value::from("first")));
}

#[test]
fn test_if_present_skips_missing() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    assert!(!run.set("status", "done".into(), SetMode::IfPresent).unwrap());
    assert!(!run.exists("status").unwrap());

    run.set("status", "pending".into(), SetMode::Always).unwrap();
    assert!(run.set("status", "done".into(), SetMode::IfPresent).unwrap());
    assert_eq!(run.get("status").unwrap(), Some(Value::from("done")));
}

#[test]
fn test_explicit_null_counts_as_present() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("slot", Value::Null, SetMode::Always).unwrap();

    assert!(run.exists("slot").unwrap());
    assert!(!run.set("slot", 1.into(), SetMode::IfAbsent).unwrap());
    assert_eq!(run.get("slot").unwrap(), Some(Value::Null));
}

#[test]
fn test_batched_set_reports_per_key() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("a", 1.into(), SetMode::Always).unwrap();
    let updates = run
        .set_many(
            vec![("a".into(), 10.into()), ("b".into(), 20.into())],
            SetMode::IfAbsent,
            false,
        )
        .unwrap();

    let written: Vec<_> = updates.iter().map(|u| (u.key.as_str(), u.written)).collect();
    assert_eq!(written, vec![("a", false), ("b", true)]);
    assert_eq!(run.get("a").unwrap(), Some(Value::Int(1)));
    assert_eq!(run.get("b").unwrap(), Some(Value::Int(20)));
}

#[test]
fn test_later_keys_see_earlier_writes() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    let updates = run
        .set_many(
            vec![("k".into(), 1.into()), ("k".into(), 2.into())],
            SetMode::IfAbsent,
            false,
        )
        .unwrap();

    assert!(updates[0].written);
    assert!(!updates[1].written);
    assert_eq!(run.get("k").unwrap(), Some(Value::Int(1)));
}
