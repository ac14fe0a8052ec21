use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use super::*;
use crate::factory::GraphModelFactory;
use crate::select::{SelectAction, SelectAllAction, SelectAllCommand, SelectCommand};

// =============================================================
// Helpers
// =============================================================

#[derive(Clone, Default)]
struct Recorder {
    changes: Rc<RefCell<Vec<ModelChange>>>,
}

impl ModelChangeListener for Recorder {
    fn model_changed(&self, _root: &SceneRoot, change: &ModelChange) {
        self.changes.borrow_mut().push(change.clone());
    }
}

fn graph_schema() -> ElementSchema {
    ElementSchema::from_value(json!({
        "id": "graph",
        "type": "graph",
        "children": [
            {"id": "node1", "type": "node", "selected": false},
            {"id": "node0", "type": "node", "selected": true}
        ]
    }))
    .unwrap()
}

fn stack_with(config: DiagramConfig) -> CommandStack {
    let mut stack = CommandStack::new(GraphModelFactory::new(), config);
    stack.set_model(&graph_schema()).unwrap();
    stack
}

fn loaded_stack() -> CommandStack {
    stack_with(DiagramConfig::default())
}

fn select(id: &str) -> Box<dyn Command> {
    Box::new(SelectCommand::new(SelectAction::new([id], Vec::<String>::new())))
}

fn is_selected(stack: &CommandStack, id: &str) -> bool {
    stack.root().index.get_by_id(id).and_then(|e| e.selected()).unwrap()
}

// =============================================================
// Model
// =============================================================

#[test]
fn new_stack_holds_empty_root() {
    let stack = CommandStack::new(GraphModelFactory::new(), DiagramConfig::default());
    assert_eq!(stack.root().id(), "EMPTY");
    assert!(!stack.can_undo());
    assert!(!stack.can_redo());
}

#[test]
fn set_model_clears_history() {
    let mut stack = loaded_stack();
    stack.execute(select("node1")).unwrap();
    assert!(stack.can_undo());

    stack.set_model(&graph_schema()).unwrap();
    assert!(!stack.can_undo());
    assert!(!is_selected(&stack, "node1"));
}

#[test]
fn set_model_failure_keeps_current_model() {
    let mut stack = loaded_stack();
    stack.execute(select("node1")).unwrap();
    let bad = ElementSchema::new("g", "graph").with_children(vec![ElementSchema::new("n", "node"), ElementSchema::new("n", "node")]);

    assert!(stack.set_model(&bad).is_err());
    assert_eq!(stack.root().id(), "graph");
    assert_eq!(stack.undo_depth(), 1);
}

#[test]
fn schema_reflects_current_model() {
    let mut stack = loaded_stack();
    stack.execute(select("node1")).unwrap();
    let schema = stack.schema();
    let ids: Vec<&str> = schema.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["node0", "node1"]);
    assert_eq!(schema.children[1].selected, Some(true));
}

// =============================================================
// History
// =============================================================

#[test]
fn undo_redo_walk_history() {
    let mut stack = loaded_stack();
    stack.execute(select("node1")).unwrap();
    assert!(is_selected(&stack, "node1"));

    assert!(stack.undo().unwrap());
    assert!(!is_selected(&stack, "node1"));
    assert!(stack.can_redo());

    assert!(stack.redo().unwrap());
    assert!(is_selected(&stack, "node1"));
    assert_eq!(stack.undo_depth(), 1);
    assert_eq!(stack.redo_depth(), 0);
}

#[test]
fn undo_and_redo_on_empty_history_report_false() {
    let mut stack = loaded_stack();
    assert!(!stack.undo().unwrap());
    assert!(!stack.redo().unwrap());
}

#[test]
fn execute_clears_redo() {
    let mut stack = loaded_stack();
    stack.execute(select("node1")).unwrap();
    stack.undo().unwrap();
    assert!(stack.can_redo());

    stack.execute(Box::new(SelectAllCommand::new(SelectAllAction::new(false)))).unwrap();
    assert!(!stack.can_redo());
}

#[test]
fn history_is_capped() {
    let mut stack = stack_with(DiagramConfig { undo_history_limit: 2, ..DiagramConfig::default() });
    for _ in 0..5 {
        stack.execute(Box::new(SelectAllCommand::new(SelectAllAction::new(true)))).unwrap();
    }
    assert_eq!(stack.undo_depth(), 2);
    assert!(stack.undo().unwrap());
    assert!(stack.undo().unwrap());
    assert!(!stack.undo().unwrap());
    assert_eq!(stack.redo_depth(), 2);
}

#[test]
fn zero_limit_keeps_no_history() {
    let mut stack = stack_with(DiagramConfig { undo_history_limit: 0, ..DiagramConfig::default() });
    stack.execute(select("node1")).unwrap();
    assert!(is_selected(&stack, "node1"));
    assert!(!stack.can_undo());
}

#[test]
fn failed_command_is_not_recorded() {
    let mut stack = loaded_stack();
    let factory = GraphModelFactory::new();
    let clock = LogicalClock::new();
    let mut used = SelectCommand::new(SelectAction::new(["node1"], Vec::<String>::new()));
    let mut ctx = CommandExecutionContext {
        root: SceneRoot::default(),
        model_factory: &factory,
        duration: 0,
        model_changed: &NoopListener,
        span: tracing::Span::none(),
        syncer: &clock,
    };
    used.execute(&mut ctx).unwrap();

    let before = stack.root().clone();
    let err = stack.execute(Box::new(used)).unwrap_err();
    assert!(matches!(err, CommandError::OutOfSequence { .. }));
    assert_eq!(stack.root(), &before);
    assert!(!stack.can_undo());
}

// =============================================================
// Notifications
// =============================================================

#[test]
fn listener_sees_every_operation_in_frame_order() {
    let recorder = Recorder::default();
    let mut stack = CommandStack::new(GraphModelFactory::new(), DiagramConfig::default()).with_listener(recorder.clone());
    stack.set_model(&graph_schema()).unwrap();

    stack.execute(select("node1")).unwrap();
    stack.undo().unwrap();
    stack.redo().unwrap();

    let changes = recorder.changes.borrow();
    let seen: Vec<(CommandOp, &str, u64)> = changes.iter().map(|c| (c.operation, c.command, c.frame)).collect();
    assert_eq!(
        seen,
        vec![(CommandOp::Execute, "select", 1), (CommandOp::Undo, "select", 2), (CommandOp::Redo, "select", 3)]
    );
}

#[test]
fn empty_undo_does_not_notify() {
    let recorder = Recorder::default();
    let mut stack = CommandStack::new(GraphModelFactory::new(), DiagramConfig::default()).with_listener(recorder.clone());
    stack.undo().unwrap();
    assert!(recorder.changes.borrow().is_empty());
}

// =============================================================
// Dispatch
// =============================================================

#[test]
fn dispatch_runs_actions_and_history_requests() {
    let mut stack = loaded_stack();
    let action: Action = serde_json::from_value(json!({
        "kind": "elementSelected",
        "selectedElementsIDs": ["node1"],
        "deselectedElementsIDs": ["node0"]
    }))
    .unwrap();

    assert!(stack.dispatch(action).unwrap());
    assert!(is_selected(&stack, "node1"));
    assert!(!is_selected(&stack, "node0"));

    assert!(stack.dispatch(Action::Undo).unwrap());
    assert!(is_selected(&stack, "node0"));

    assert!(stack.dispatch(Action::Redo).unwrap());
    assert!(is_selected(&stack, "node1"));
    assert!(!stack.dispatch(Action::Redo).unwrap());
}
