//! Basic Operations Tests
//!
//! get, set, exists, getAll, remove and clear on a single scope.

use crate::*;

// =============================================================================
// GET / SET TESTS
// =============================================================================

#[test]
fn test_set_and_get_roundtrip() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    assert!(run.set("name", "Ada".into(), SetMode::Always).unwrap());
    assert_eq!(run.get("name").unwrap(), Some(Value::from("Ada")));
}

#[test]
fn test_get_missing_returns_none() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    assert_eq!(run.get("missing").unwrap(), None);
    assert!(!run.exists("missing").unwrap());
}

#[test]
fn test_nested_paths_create_objects() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("user.profile.city", "Paris".into(), SetMode::Always)
        .unwrap();

    assert_eq!(
        run.get("user").unwrap(),
        Some(Value::from(json!({"profile": {"city": "Paris"}})))
    );
    assert!(run.exists("user.profile").unwrap());
}

#[test]
fn test_set_through_scalar_replaces_it() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("a", 1.into(), SetMode::Always).unwrap();
    run.set("a.b", 2.into(), SetMode::Always).unwrap();

    assert_eq!(run.get("a").unwrap(), Some(Value::from(json!({"b": 2}))));
}

#[test]
fn test_get_below_scalar_is_none() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("a", "text".into(), SetMode::Always).unwrap();
    assert_eq!(run.get("a.b").unwrap(), None);
}

#[test]
fn test_invalid_paths_are_rejected() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    for path in ["", "a..b", ".a", "a."] {
        let err = run.set(path, 1.into(), SetMode::Always).unwrap_err();
        assert!(
            matches!(Error::from(err), Error::InvalidPath(_)),
            "path {:?} should be invalid",
            path
        );
    }
}

#[test]
fn test_get_all_is_a_snapshot() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("a", 1.into(), SetMode::Always).unwrap();
    let snapshot = run.get_all();
    run.set("b", 2.into(), SetMode::Always).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(run.get_all().len(), 2);
}

#[test]
fn test_get_all_preserves_insertion_order() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    for key in ["zeta", "alpha", "mid"] {
        run.set(key, true.into(), SetMode::Always).unwrap();
    }

    let keys: Vec<_> = run.get_all().keys().cloned().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

// =============================================================================
// REMOVE / CLEAR TESTS
// =============================================================================

#[test]
fn test_remove_nested_leaf() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("user.name", "Ada".into(), SetMode::Always).unwrap();
    run.set("user.age", 36.into(), SetMode::Always).unwrap();

    assert!(run.remove("user.age").unwrap());
    assert!(!run.remove("user.age").unwrap());
    assert_eq!(
        run.get("user").unwrap(),
        Some(Value::from(json!({"name": "Ada"})))
    );
}

#[test]
fn test_clear_whole_scope() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("a", 1.into(), SetMode::Always).unwrap();
    run.set("b", 2.into(), SetMode::Always).unwrap();

    assert!(run.clear(None).unwrap());
    assert!(run.get_all().is_empty());
    assert!(!run.clear(None).unwrap());
}

#[test]
fn test_clear_single_key() {
    let stash = create_stash();
    let run = stash.execution(EXEC, WORKFLOW);

    run.set("a", 1.into(), SetMode::Always).unwrap();
    run.set("b", 2.into(), SetMode::Always).unwrap();

    assert!(run.clear(Some("a")).unwrap());
    assert_eq!(run.get_all().len(), 1);
    assert!(run.exists("b").unwrap());
}
