//! Moving elements to new positions.

#[cfg(test)]
#[path = "movement_test.rs"]
mod movement_test;

use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandExecutionContext, CommandOp, CommandState, Lifecycle};
use crate::error::CommandError;
use crate::geometry::Point;
use crate::model::{ElementId, SceneRoot};

/// Target position for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementMove {
    pub element_id: ElementId,
    pub to_position: Point,
}

/// Request to move elements. `animate` is carried for hosts that animate;
/// the command itself always lands on the final positions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAction {
    pub moves: Vec<ElementMove>,
    #[serde(default)]
    pub animate: bool,
}

impl MoveAction {
    pub const KIND: &'static str = "move";

    #[must_use]
    pub fn new(moves: Vec<ElementMove>) -> Self {
        Self { moves, animate: false }
    }
}

#[derive(Debug, Clone)]
struct ResolvedMove {
    id: ElementId,
    from: Point,
    to: Point,
}

#[derive(Debug)]
pub struct MoveCommand {
    action: MoveAction,
    lifecycle: Lifecycle,
    resolved: Vec<ResolvedMove>,
}

impl MoveCommand {
    const NAME: &'static str = "move";

    #[must_use]
    pub fn new(action: MoveAction) -> Self {
        Self { action, lifecycle: Lifecycle::default(), resolved: Vec::new() }
    }

    fn set_positions(root: &mut SceneRoot, positions: impl Iterator<Item = (ElementId, Point)>) {
        for (id, position) in positions {
            if let Some(element) = root.index.get_by_id_mut(&id) {
                element.set_position(position);
            }
        }
    }
}

impl Command for MoveCommand {
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

        self.resolved = self
            .action
            .moves
            .iter()
            .filter_map(|m| {
                let from = ctx.root.index.get_by_id(&m.element_id)?.position()?;
                Some(ResolvedMove { id: m.element_id.clone(), from, to: m.to_position })
            })
            .collect();
        Self::set_positions(&mut ctx.root, self.resolved.iter().map(|m| (m.id.clone(), m.to)));
        tracing::debug!(
            command = Self::NAME,
            requested = self.action.moves.len(),
            moved = self.resolved.len(),
            animate = self.action.animate,
            "executed"
        );
        Ok(())
    }

    fn undo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Undo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        Self::set_positions(&mut ctx.root, self.resolved.iter().map(|m| (m.id.clone(), m.from)));
        tracing::debug!(command = Self::NAME, moved = self.resolved.len(), "undone");
        Ok(())
    }

    fn redo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Redo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        Self::set_positions(&mut ctx.root, self.resolved.iter().map(|m| (m.id.clone(), m.to)));
        tracing::debug!(command = Self::NAME, moved = self.resolved.len(), "redone");
        Ok(())
    }
}
