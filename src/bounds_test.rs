#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::command::{LogicalClock, NoopListener};
use crate::factory::{GraphModelFactory, ModelFactory};
use crate::schema::ElementSchema;

// =============================================================
// Helpers
// =============================================================

fn context<'a>(root: SceneRoot, factory: &'a GraphModelFactory, clock: &'a LogicalClock) -> CommandExecutionContext<'a> {
    CommandExecutionContext {
        root,
        model_factory: factory,
        duration: 0,
        model_changed: &NoopListener,
        span: tracing::Span::none(),
        syncer: clock,
    }
}

fn graph(factory: &GraphModelFactory) -> SceneRoot {
    let schema = ElementSchema::from_value(json!({
        "id": "graph",
        "type": "graph",
        "x": 1000, "y": 1000,
        "width": 800, "height": 600,
        "children": [
            {"id": "a", "type": "node", "x": 0, "y": 0, "width": 100, "height": 50, "children": [
                {"id": "a.port", "type": "port", "width": 10, "height": 10}
            ]},
            {"id": "b", "type": "node", "x": 200, "y": 100, "width": 50, "height": 50},
            {"id": "unsized", "type": "node", "x": 900, "y": 900},
            {"id": "e", "type": "edge"}
        ]
    }))
    .unwrap();
    factory.create_root(&schema).unwrap()
}

fn bounds_of(id: &str, x: f64, y: f64, w: f64, h: f64) -> ElementAndBounds {
    ElementAndBounds { element_id: id.to_string(), new_bounds: Bounds::new(x, y, w, h) }
}

// =============================================================
// Queries
// =============================================================

#[test]
fn absolute_bounds_adds_ancestor_positions() {
    let factory = GraphModelFactory::new();
    let mut root = graph(&factory);
    root.index.get_by_id_mut("a").unwrap().set_position(Point::new(30.0, 40.0));
    assert_eq!(absolute_bounds(&root, "a.port"), Bounds::new(30.0, 40.0, 10.0, 10.0));
}

#[test]
fn absolute_bounds_of_unknown_is_empty() {
    let factory = GraphModelFactory::new();
    assert_eq!(absolute_bounds(&graph(&factory), "ghost"), Bounds::EMPTY);
}

#[test]
fn diagram_bounds_of_everything() {
    let factory = GraphModelFactory::new();
    let root = graph(&factory);
    assert_eq!(diagram_bounds(&root, &[]), Bounds::new(0.0, 0.0, 250.0, 150.0));
}

#[test]
fn diagram_bounds_of_selection() {
    let factory = GraphModelFactory::new();
    let root = graph(&factory);
    assert_eq!(diagram_bounds(&root, &["b".to_string()]), Bounds::new(200.0, 100.0, 50.0, 50.0));
}

#[test]
fn diagram_bounds_without_sized_elements_is_empty() {
    let factory = GraphModelFactory::new();
    let root = graph(&factory);
    let ids = vec!["e".to_string(), "unsized".to_string(), "ghost".to_string()];
    assert_eq!(diagram_bounds(&root, &ids), Bounds::EMPTY);
}

// =============================================================
// SetBoundsCommand
// =============================================================

#[test]
fn set_bounds_execute_undo_redo() {
    let factory = GraphModelFactory::new();
    let clock = LogicalClock::new();
    let before = graph(&factory);
    let mut ctx = context(before.clone(), &factory, &clock);
    let mut cmd = SetBoundsCommand::new(SetBoundsAction::new(vec![
        bounds_of("unsized", 5.0, 6.0, 70.0, 80.0),
        bounds_of("a.port", 90.0, 0.0, 12.0, 12.0),
    ]));

    cmd.execute(&mut ctx).unwrap();
    let unsized_node = ctx.root.index.get_by_id("unsized").unwrap();
    assert_eq!(unsized_node.bounds(), Bounds::new(5.0, 6.0, 70.0, 80.0));
    // Ports have no position, only the size applies.
    let port = ctx.root.index.get_by_id("a.port").unwrap();
    assert_eq!(port.bounds(), Bounds::new(0.0, 0.0, 12.0, 12.0));
    let executed = ctx.root.clone();

    cmd.undo(&mut ctx).unwrap();
    assert_eq!(ctx.root, before);

    cmd.redo(&mut ctx).unwrap();
    assert_eq!(ctx.root, executed);
}

#[test]
fn set_bounds_skips_elements_without_size() {
    let factory = GraphModelFactory::new();
    let clock = LogicalClock::new();
    let before = graph(&factory);
    let mut ctx = context(before.clone(), &factory, &clock);
    let mut cmd =
        SetBoundsCommand::new(SetBoundsAction::new(vec![bounds_of("e", 1.0, 1.0, 1.0, 1.0), bounds_of("ghost", 1.0, 1.0, 1.0, 1.0)]));

    cmd.execute(&mut ctx).unwrap();
    assert_eq!(ctx.root, before);
}

#[test]
fn set_bounds_action_json_shape() {
    let action: SetBoundsAction = serde_json::from_value(json!({
        "bounds": [{"elementId": "a", "newBounds": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}}]
    }))
    .unwrap();
    assert_eq!(action, SetBoundsAction::new(vec![bounds_of("a", 1.0, 2.0, 3.0, 4.0)]));
}
