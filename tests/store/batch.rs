//! Host Batch Tests
//!
//! JSON items run through `Stash::execute_batch`, in strict and lenient mode.

use crate::*;

fn invocation() -> Invocation {
    Invocation::new(EXEC, WORKFLOW)
}

// =============================================================================
// RECORD SHAPES
// =============================================================================

#[test]
fn test_records_follow_item_order() {
    let stash = create_stash();

    let records = stash
        .execute_batch(
            vec![
                json!({"operation": "set", "key": "user.name", "value": "Ada"}),
                json!({"operation": "get", "key": "user.name"}),
                json!({"operation": "get", "key": "user"}),
                json!({"operation": "exists", "key": "user.age"}),
            ],
            &invocation(),
        )
        .unwrap();

    let json: Vec<_> = records.iter().map(ItemRecord::to_json).collect();
    assert_eq!(json[0]["updates"], json!([{"key": "user.name", "written": true}]));
    assert_eq!(json[1]["value"], json!({"name": "Ada"}));
    assert_eq!(json[2]["value"], json!({"name": "Ada"}));
    assert_eq!(json[3]["exists"], json!(false));
    assert!(records.iter().all(|r| r.success));
}

#[test]
fn test_missing_get_reports_null() {
    let stash = create_stash();

    let records = stash
        .execute_batch(vec![json!({"operation": "get", "key": "a.b"})], &invocation())
        .unwrap();

    let out = records[0].to_json();
    assert_eq!(out["value"], json!({"b": null}));
    assert_eq!(out["found"], json!(false));
    assert_eq!(out["scope"], json!("execution"));
}

#[test]
fn test_counter_and_array_records() {
    let stash = create_stash();

    let records = stash
        .execute_batch(
            vec![
                json!({"operation": "increment", "scope": "workflow", "key": "runs"}),
                json!({"operation": "decrement", "scope": "workflow", "key": "runs", "amount": "3"}),
                json!({"operation": "push", "key": "q", "value": "a"}),
                json!({"operation": "pop", "key": "q"}),
            ],
            &invocation(),
        )
        .unwrap();

    let json: Vec<_> = records.iter().map(ItemRecord::to_json).collect();
    assert_eq!((json[0]["old"].clone(), json[0]["new"].clone()), (json!(0), json!(1)));
    assert_eq!(json[1]["new"], json!(-2));
    assert_eq!(json[2]["length"], json!(1));
    assert_eq!(json[3]["value"], json!("a"));
    assert_eq!(json[3]["length"], json!(0));
}

// =============================================================================
// VALUE DECODING
// =============================================================================

#[test]
fn test_value_types_decode() {
    let stash = create_stash();

    stash
        .execute_batch(
            vec![
                json!({"operation": "set", "key": "n", "value": "42", "valueType": "number"}),
                json!({"operation": "set", "key": "f", "value": "TRUE", "valueType": "boolean"}),
                json!({"operation": "set", "key": "o", "value": "{\"a\":[1]}", "valueType": "json"}),
                json!({"operation": "set", "key": "s", "value": 7}),
            ],
            &invocation(),
        )
        .unwrap();

    let run = stash.execution(EXEC, WORKFLOW);
    assert_eq!(run.get("n").unwrap(), Some(Value::Int(42)));
    assert_eq!(run.get("f").unwrap(), Some(Value::Bool(true)));
    assert_eq!(run.get("o").unwrap(), Some(Value::from(json!({"a": [1]}))));
    assert_eq!(run.get("s").unwrap(), Some(Value::from("7")));
}

#[test]
fn test_malformed_json_kept_as_text() {
    let stash = create_stash();

    let records = stash
        .execute_batch(
            vec![json!({"operation": "set", "key": "raw", "value": "{not json", "valueType": "json"})],
            &invocation(),
        )
        .unwrap();

    assert!(records[0].success);
    assert_eq!(
        stash.execution(EXEC, WORKFLOW).get("raw").unwrap(),
        Some(Value::from("{not json"))
    );
}

// =============================================================================
// STRICT VS LENIENT
// =============================================================================

#[test]
fn test_strict_batch_aborts_at_failure() {
    let stash = create_stash();

    let err = stash
        .execute_batch(
            vec![
                json!({"operation": "set", "key": "a", "value": "1"}),
                json!({"operation": "pop", "key": "missing"}),
                json!({"operation": "set", "key": "b", "value": "2"}),
            ],
            &invocation(),
        )
        .unwrap_err();

    assert_eq!(err.item_index(), Some(1));
    assert!(err.is_not_found());

    let run = stash.execution(EXEC, WORKFLOW);
    assert!(run.exists("a").unwrap());
    assert!(!run.exists("b").unwrap());
}

#[test]
fn test_lenient_batch_records_failures() {
    let stash = create_stash();

    let records = stash
        .execute_batch(
            vec![
                json!({"operation": "pop", "key": "missing"}),
                json!({"operation": "teleport", "key": "x"}),
                json!({"operation": "set", "key": "b", "value": "2"}),
            ],
            &invocation().lenient(true),
        )
        .unwrap();

    assert_eq!(records.len(), 3);
    assert!(!records[0].success);
    assert_eq!(records[0].code, Some("NotFound"));
    assert_eq!(records[1].code, Some("UnknownOperation"));
    assert!(records[2].success);
}

#[test]
fn test_strict_multi_key_set_is_atomic() {
    let stash = create_stash();

    let err = stash
        .execute_batch(
            vec![json!({"operation": "set", "values": [
                {"key": "good", "value": "1"},
                {"key": "bad..path", "value": "2"},
            ]})],
            &invocation(),
        )
        .unwrap_err();

    assert_eq!(err.item_index(), Some(0));
    assert!(!stash.execution(EXEC, WORKFLOW).exists("good").unwrap());
}

#[test]
fn test_lenient_multi_key_set_reports_per_key() {
    let stash = create_stash();

    let records = stash
        .execute_batch(
            vec![json!({"operation": "set", "values": [
                {"key": "good", "value": "1", "valueType": "number"},
                {"key": "bad..path", "value": "2"},
            ]})],
            &invocation().lenient(true),
        )
        .unwrap();

    let record = &records[0];
    assert!(!record.success);
    let updates = record.updates.as_ref().unwrap();
    assert!(updates[0].written);
    assert!(updates[1].error.is_some());
    assert_eq!(
        stash.execution(EXEC, WORKFLOW).get("good").unwrap(),
        Some(Value::Int(1))
    );
}

#[test]
fn test_workflow_items_shared_across_invocations() {
    let stash = create_stash();
    let item = json!({"operation": "increment", "scope": "workflow", "key": "runs"});

    for run in ["run-a", "run-b"] {
        stash
            .execute_batch(vec![item.clone()], &Invocation::new(run, WORKFLOW))
            .unwrap();
    }

    assert_eq!(stash.workflow(WORKFLOW).get("runs").unwrap(), Some(Value::Int(2)));
}
