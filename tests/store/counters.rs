//! Counter Tests
//!
//! increment / decrement with integer and float amounts.

use crate::*;

#[test]
fn test_increment_missing_starts_at_zero() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    let update = run.increment("visits", 1).unwrap();

    assert_eq!(update.old, Value::Int(0));
    assert_eq!(update.new, Value::Int(1));
    assert_eq!(run.get("visits").unwrap(), Some(Value::Int(1)));
}

#[test]
fn test_decrement_below_zero() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.increment("n", 2).unwrap();
    let update = run.decrement("n", 5).unwrap();

    assert_eq!(update.old, Value::Int(2));
    assert_eq!(update.new, Value::Int(-3));
}

#[test]
fn test_float_amount_promotes() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.increment("score", 1).unwrap();
    let update = run.increment("score", 0.5).unwrap();

    assert_eq!(update.new, Value::Float(1.5));
}

#[test]
fn test_non_numeric_value_counts_as_zero() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("n", "oops".into(), SetMode::Always).unwrap();
    let update = run.increment("n", 4).unwrap();

    assert_eq!(update.old, Value::Int(0));
    assert_eq!(update.new, Value::Int(4));
}

#[test]
fn test_overflow_falls_back_to_float() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("big", Value::Int(i64::MAX), SetMode::Always).unwrap();
    let update = run.increment("big", 1).unwrap();

    assert!(matches!(update.new, Value::Float(_)));
}

#[test]
fn test_non_numeric_amount_rejected() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    let err = Error::from(run.increment("n", "one").unwrap_err());
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(!run.exists("n").unwrap());
}

#[test]
fn test_workflow_counter_across_runs() {
    let stash = create_stash();

    for run in ["run-a", "run-b", "run-c"] {
        stash
            .scope(Scope::Workflow, run, WORKFLOW)
            .increment("runs", 1)
            .unwrap();
    }

    assert_eq!(stash.workflow(WORKFLOW).get("runs").unwrap(), Some(Value::Int(3)));
}

mod properties {
    use crate::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn counter_equals_sum_of_steps(steps in proptest::collection::vec(-1_000i64..1_000, 1..40)) {
            let stash = create_stash();
            let run = stash.execution(EXEC, WORKFLOW);

            for step in &steps {
                if *step >= 0 {
                    run.increment("n", *step).unwrap();
                } else {
                    run.decrement("n", -*step).unwrap();
                }
            }

            prop_assert_eq!(run.get("n").unwrap(), Some(Value::Int(steps.iter().sum())));
        }
    }
}
