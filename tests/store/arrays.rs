//! Array Operation Tests
//!
//! push, unshift, pop and shift.

use crate::*;

#[test]
fn test_push_creates_array() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    assert_eq!(run.push("events", "start".into()).unwrap(), 1);
    assert_eq!(run.push("events", "step".into()).unwrap(), 2);

    assert_eq!(
        run.get("events").unwrap(),
        Some(Value::from(json!(["start", "step"])))
    );
}

#[test]
fn test_unshift_prepends() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.push("queue", 2.into()).unwrap();
    assert_eq!(run.unshift("queue", 1.into()).unwrap(), 2);

    assert_eq!(run.get("queue").unwrap(), Some(Value::from(json!([1, 2]))));
}

#[test]
fn test_pop_and_shift_take_from_each_end() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    for i in 1..=3 {
        run.push("q", Value::Int(i)).unwrap();
    }

    let last = run.pop("q").unwrap();
    assert_eq!(last.value, Value::Int(3));
    assert_eq!(last.length, 2);

    let first = run.shift("q").unwrap();
    assert_eq!(first.value, Value::Int(1));
    assert_eq!(first.length, 1);
}

#[test]
fn test_pop_empty_array_yields_null() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("q", Value::Array(vec![]), SetMode::Always).unwrap();

    let popped = run.pop("q").unwrap();
    assert_eq!(popped.value, Value::Null);
    assert_eq!(popped.length, 0);
    assert_eq!(run.shift("q").unwrap().value, Value::Null);
}

#[test]
fn test_pop_missing_is_not_found() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    let err = Error::from(run.pop("nothing").unwrap_err());
    assert!(err.is_not_found());
    assert!(Error::from(run.shift("nothing").unwrap_err()).is_not_found());
}

#[test]
fn test_array_ops_on_scalar_fail() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("name", "Ada".into(), SetMode::Always).unwrap();

    for err in [
        run.push("name", 1.into()).unwrap_err(),
        run.unshift("name", 1.into()).unwrap_err(),
    ] {
        assert!(matches!(Error::from(err), Error::NotArray { .. }));
    }
    assert!(matches!(
        Error::from(run.pop("name").unwrap_err()),
        Error::NotArray { .. }
    ));
    assert_eq!(run.get("name").unwrap(), Some(Value::from("Ada")));
}

#[test]
fn test_push_nested_path() {
    let stash = create_stash();
    let run = stash.workflow(WORKFLOW);

    run.push("audit.log", json!({"who": "ada"}).into()).unwrap();

    assert_eq!(
        run.get("audit").unwrap(),
        Some(Value::from(json!({"log": [{"who": "ada"}]})))
    );
}
