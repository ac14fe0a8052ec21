//! Element bounds: applying measured bounds and combining them.
//!
//! DESIGN
//! ======
//! Bounds are derived, not stored: position (moveable elements) plus size
//! (bounds-aware elements). `SetBoundsCommand` writes both parts where the
//! element has them. Elements without a size are skipped.

#[cfg(test)]
#[path = "bounds_test.rs"]
mod bounds_test;

use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandExecutionContext, CommandOp, CommandState, Lifecycle};
use crate::error::CommandError;
use crate::geometry::{Bounds, Dimension, Point};
use crate::model::{ElementId, Feature, SceneRoot};

// =============================================================================
// QUERIES
// =============================================================================

/// Bounds of `id` in root coordinates: its own bounds shifted by the
/// positions of all its ancestors below the root.
#[must_use]
pub fn absolute_bounds(root: &SceneRoot, id: &str) -> Bounds {
    let Some(element) = root.index.get_by_id(id) else {
        return Bounds::EMPTY;
    };
    let mut bounds = element.bounds();
    let mut parent = element.parent();
    while let Some(ancestor) = parent.and_then(|p| root.index.get_by_id(p)) {
        if ancestor.id() == root.id() {
            break;
        }
        if let Some(offset) = ancestor.position() {
            bounds = bounds.translate(offset.x, offset.y);
        }
        parent = ancestor.parent();
    }
    bounds
}

/// Combined root-coordinate bounds of the named elements, or of every
/// bounds-aware element below the root when `ids` is empty. Returns
/// `Bounds::EMPTY` if nothing has valid bounds.
#[must_use]
pub fn diagram_bounds(root: &SceneRoot, ids: &[ElementId]) -> Bounds {
    let elements: Vec<_> = if ids.is_empty() {
        root.walk().into_iter().filter(|e| e.id() != root.id()).collect()
    } else {
        ids.iter().filter_map(|id| root.index.get_by_id(id)).collect()
    };
    elements
        .into_iter()
        .filter(|e| e.has_feature(Feature::Bounds))
        .fold(Bounds::EMPTY, |acc, e| acc.combine(&absolute_bounds(root, e.id())))
}

// =============================================================================
// SET BOUNDS
// =============================================================================

/// New bounds for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAndBounds {
    pub element_id: ElementId,
    pub new_bounds: Bounds,
}

/// Request to apply measured bounds to elements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetBoundsAction {
    pub bounds: Vec<ElementAndBounds>,
}

impl SetBoundsAction {
    pub const KIND: &'static str = "setBounds";

    #[must_use]
    pub fn new(bounds: Vec<ElementAndBounds>) -> Self {
        Self { bounds }
    }
}

#[derive(Debug, Clone)]
struct BoundsChange {
    id: ElementId,
    old_position: Option<Point>,
    old_size: Dimension,
    new_bounds: Bounds,
}

#[derive(Debug)]
pub struct SetBoundsCommand {
    action: SetBoundsAction,
    lifecycle: Lifecycle,
    changes: Vec<BoundsChange>,
}

impl SetBoundsCommand {
    const NAME: &'static str = "set-bounds";

    #[must_use]
    pub fn new(action: SetBoundsAction) -> Self {
        Self { action, lifecycle: Lifecycle::default(), changes: Vec::new() }
    }

    fn apply(&self, root: &mut SceneRoot) {
        for change in &self.changes {
            if let Some(element) = root.index.get_by_id_mut(&change.id) {
                element.set_size(change.new_bounds.size());
                element.set_position(change.new_bounds.position());
            }
        }
    }
}

impl Command for SetBoundsCommand {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn state(&self) -> CommandState {
        self.lifecycle.state()
    }

    fn execute(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Execute)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        self.changes = self
            .action
            .bounds
            .iter()
            .filter_map(|b| {
                let element = ctx.root.index.get_by_id(&b.element_id)?;
                Some(BoundsChange {
                    id: b.element_id.clone(),
                    old_position: element.position(),
                    old_size: element.size()?,
                    new_bounds: b.new_bounds,
                })
            })
            .collect();
        self.apply(&mut ctx.root);
        tracing::debug!(command = Self::NAME, changed = self.changes.len(), "executed");
        Ok(())
    }

    fn undo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Undo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        for change in &self.changes {
            if let Some(element) = ctx.root.index.get_by_id_mut(&change.id) {
                element.set_size(change.old_size);
                if let Some(position) = change.old_position {
                    element.set_position(position);
                }
            }
        }
        tracing::debug!(command = Self::NAME, changed = self.changes.len(), "undone");
        Ok(())
    }

    fn redo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Redo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        self.apply(&mut ctx.root);
        tracing::debug!(command = Self::NAME, changed = self.changes.len(), "redone");
        Ok(())
    }
}
