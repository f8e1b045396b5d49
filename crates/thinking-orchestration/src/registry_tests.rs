use super::*;
use crate::definition::{ConditionOperator, StepCondition, WorkflowStep};
use serde_json::json;
use std::thread;

fn workflow(id: &str) -> Workflow {
    Workflow::new(id, "Analyse", WorkflowType::Sequential).with_step(
        WorkflowStep::new("s1", "think")
            .with_input("content", json!("$problem"))
            .store_as("analysis"),
    )
}

#[test]
fn test_register_and_get() {
    let registry = WorkflowRegistry::new();
    let registered = registry.register(workflow("wf-1")).unwrap();
    assert!(registered.created_at.is_some());

    let fetched = registry.get("wf-1").unwrap();
    assert!(Arc::ptr_eq(&registered, &fetched));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_get_unknown() {
    let registry = WorkflowRegistry::default();
    assert!(matches!(
        registry.get("does-not-exist"),
        Err(WorkflowError::NotFound(_))
    ));
}

#[test]
fn test_duplicate_registration_rejected() {
    let registry = WorkflowRegistry::new();
    registry.register(workflow("wf-1")).unwrap();

    let err = registry.register(workflow("wf-1")).unwrap_err();
    assert!(matches!(err, WorkflowError::DuplicateWorkflow(ref id) if id == "wf-1"));
    assert_eq!(registry.list().len(), 1);
}

#[test]
fn test_missing_id_name_steps() {
    let registry = WorkflowRegistry::new();

    let mut wf = workflow("wf");
    wf.id = String::new();
    assert!(matches!(registry.register(wf), Err(WorkflowError::MissingField(ref f)) if f == "id"));

    let mut wf = workflow("wf");
    wf.name = "  ".into();
    assert!(matches!(registry.register(wf), Err(WorkflowError::MissingField(ref f)) if f == "name"));

    let mut wf = workflow("wf");
    wf.steps.clear();
    assert!(matches!(registry.register(wf), Err(WorkflowError::MissingField(ref f)) if f == "steps"));

    assert!(registry.is_empty());
}

#[test]
fn test_invalid_and_missing_type() {
    let mut wf = workflow("wf");
    wf.workflow_type = WorkflowType::Unknown("loop".into());
    assert!(matches!(
        WorkflowRegistry::validate(&wf),
        Err(WorkflowError::InvalidType(ref t)) if t == "loop"
    ));

    wf.workflow_type = WorkflowType::default();
    assert!(matches!(
        WorkflowRegistry::validate(&wf),
        Err(WorkflowError::MissingField(ref f)) if f == "type"
    ));
}

#[test]
fn test_step_missing_id_or_tool() {
    let wf = Workflow::new("wf", "Wf", WorkflowType::Parallel)
        .with_step(WorkflowStep::new("s1", "think"))
        .with_step(WorkflowStep::new("s2", ""));
    assert!(matches!(
        WorkflowRegistry::validate(&wf),
        Err(WorkflowError::MissingField(ref f)) if f == "steps[1].tool"
    ));

    let wf = Workflow::new("wf", "Wf", WorkflowType::Parallel).with_step(WorkflowStep::new("", "think"));
    assert!(matches!(
        WorkflowRegistry::validate(&wf),
        Err(WorkflowError::MissingField(ref f)) if f == "steps[0].id"
    ));
}

#[test]
fn test_duplicate_store_key() {
    let wf = Workflow::new("wf", "Wf", WorkflowType::Parallel)
        .with_step(WorkflowStep::new("s1", "think").store_as("out"))
        .with_step(WorkflowStep::new("s2", "think").store_as("out"));
    match WorkflowRegistry::validate(&wf) {
        Err(WorkflowError::DuplicateStoreKey { key, first, second }) => {
            assert_eq!(key, "out");
            assert_eq!(first, "s1");
            assert_eq!(second, "s2");
        }
        other => panic!("Expected DuplicateStoreKey, got {:?}", other),
    }
}

#[test]
fn test_store_key_colliding_with_step_id() {
    let wf = Workflow::new("wf", "Wf", WorkflowType::Parallel)
        .with_step(WorkflowStep::new("s1", "think").store_as("s2"))
        .with_step(WorkflowStep::new("s2", "think"));
    assert!(matches!(
        WorkflowRegistry::validate(&wf),
        Err(WorkflowError::DuplicateStoreKey { .. })
    ));
}

#[test]
fn test_invalid_conditions() {
    let base = || {
        Workflow::new("wf", "Wf", WorkflowType::Conditional).with_step(WorkflowStep::new("s1", "think"))
    };

    let wf = base().with_step(WorkflowStep::new("s2", "think").with_condition(StepCondition::new(
        "",
        "x",
        ConditionOperator::Eq,
        json!(1),
    )));
    assert!(matches!(
        WorkflowRegistry::validate(&wf),
        Err(WorkflowError::InvalidCondition { .. })
    ));

    let wf = base().with_step(WorkflowStep::new("s2", "think").with_condition(StepCondition::new(
        "s1",
        "x",
        ConditionOperator::Unknown("approx".into()),
        json!(1),
    )));
    match WorkflowRegistry::validate(&wf) {
        Err(WorkflowError::InvalidCondition { step, message }) => {
            assert_eq!(step, "s2");
            assert!(message.contains("approx"));
        }
        other => panic!("Expected InvalidCondition, got {:?}", other),
    }

    let wf = base().with_step(WorkflowStep::new("s2", "think").with_condition(StepCondition::new(
        "s1",
        "x",
        ConditionOperator::Gt,
        json!("high"),
    )));
    assert!(matches!(
        WorkflowRegistry::validate(&wf),
        Err(WorkflowError::InvalidCondition { .. })
    ));
}

#[test]
fn test_cycle_rejected_at_registration() {
    let registry = WorkflowRegistry::new();
    let wf = Workflow::new("wf", "Wf", WorkflowType::Parallel)
        .with_step(WorkflowStep::new("a", "think").depends_on("b"))
        .with_step(WorkflowStep::new("b", "think").depends_on("a"));

    let err = registry.register(wf).unwrap_err();
    assert!(matches!(err, WorkflowError::Cycle { .. }));
    assert!(err.to_string().contains("a"));
    assert!(!registry.contains("wf"));
}

#[test]
fn test_list_sorted_summaries() {
    let registry = WorkflowRegistry::new();
    registry.register(workflow("b")).unwrap();
    registry.register(workflow("a")).unwrap();

    let list = registry.list();
    let ids: Vec<_> = list.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(list[0].step_count, 1);
    assert_eq!(list[0].workflow_type, WorkflowType::Sequential);
}

#[test]
fn test_concurrent_registration_single_winner() {
    let registry = Arc::new(WorkflowRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.register(workflow("contended")).is_ok())
        })
        .collect();

    let wins = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(wins, 1);
    assert_eq!(registry.len(), 1);
}
