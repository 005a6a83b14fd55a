//! Scope Isolation Tests
//!
//! Execution data is private to a run, workflow data is shared by all runs
//! of a workflow, and global data is shared by everything.

use crate::*;

#[test]
fn test_executions_are_isolated() {
    let stash = create_stash();

    stash
        .execution("run-a", WORKFLOW)
        .set("secret", "a".into(), SetMode::Always)
        .unwrap();

    assert_eq!(stash.execution("run-b", WORKFLOW).get("secret").unwrap(), None);
    assert_eq!(
        stash.execution("run-a", "other-workflow").get("secret").unwrap(),
        Some(Value::from("a"))
    );
}

#[test]
fn test_workflow_shared_across_runs() {
    let stash = create_stash();

    stash
        .scope(Scope::Workflow, "run-a", WORKFLOW)
        .set("config.retries", 3.into(), SetMode::Always)
        .unwrap();

    let seen = stash
        .scope(Scope::Workflow, "run-b", WORKFLOW)
        .get("config.retries")
        .unwrap();
    assert_eq!(seen, Some(Value::Int(3)));
    assert_eq!(stash.workflow(WORKFLOW).get("config.retries").unwrap(), seen);
}

#[test]
fn test_workflows_are_isolated() {
    let stash = create_stash();

    stash
        .workflow("wf-a")
        .set("k", 1.into(), SetMode::Always)
        .unwrap();

    assert_eq!(stash.workflow("wf-b").get("k").unwrap(), None);
}

#[test]
fn test_global_shared_by_everyone() {
    let stash = create_stash();

    stash
        .scope(Scope::Global, "run-a", "wf-a")
        .set("motd", "hello".into(), SetMode::Always)
        .unwrap();

    assert_eq!(
        stash.scope(Scope::Global, "run-z", "wf-z").get("motd").unwrap(),
        Some(Value::from("hello"))
    );
    assert_eq!(stash.global().get("motd").unwrap(), Some(Value::from("hello")));
}

#[test]
fn test_same_key_in_each_scope() {
    let stash = create_stash();

    for (scope, label) in [
        (Scope::Execution, "execution"),
        (Scope::Workflow, "workflow"),
        (Scope::Global, "global"),
    ] {
        stash
            .scope(scope, EXEC, WORKFLOW)
            .set("where", label.into(), SetMode::Always)
            .unwrap();
    }

    assert_eq!(
        stash.execution(EXEC, WORKFLOW).get("where").unwrap(),
        Some(Value::from("execution"))
    );
    assert_eq!(
        stash.workflow(WORKFLOW).get("where").unwrap(),
        Some(Value::from("workflow"))
    );
    assert_eq!(stash.global().get("where").unwrap(), Some(Value::from("global")));
}

#[test]
fn test_separate_stashes_share_nothing() {
    let first = create_stash();
    let second = create_stash();

    first.global().set("k", 1.into(), SetMode::Always).unwrap();
    assert_eq!(second.global().get("k").unwrap(), None);
}
