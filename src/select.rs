//! Selection commands.
//!
//! DESIGN
//! ======
//! `SelectCommand` flips the selected flag of the named elements. Elements
//! that become selected are moved to the end of their parent's children so
//! they render on top; when several siblings move at once they keep their
//! previous relative order. Ids that are unknown, not selectable, or name the
//! root are skipped: an action may still reference elements that were
//! removed after it was created. An id named for both selection and
//! deselection ends up deselected.
//!
//! `SelectAllCommand` sets one flag on every selectable element and never
//! reorders. Its undo restores each element's own prior flag.

#[cfg(test)]
#[path = "select_test.rs"]
mod select_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::command::{Command, CommandExecutionContext, CommandOp, CommandState, Lifecycle};
use crate::error::CommandError;
use crate::model::{ElementId, SceneRoot};

// =============================================================================
// ACTIONS
// =============================================================================

/// Request to select some elements and deselect others.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAction {
    #[serde(rename = "selectedElementsIDs", default)]
    pub selected_element_ids: Vec<ElementId>,
    #[serde(rename = "deselectedElementsIDs", default)]
    pub deselected_element_ids: Vec<ElementId>,
}

impl SelectAction {
    pub const KIND: &'static str = "elementSelected";

    #[must_use]
    pub fn new<S, D>(selected: S, deselected: D) -> Self
    where
        S: IntoIterator,
        S::Item: Into<ElementId>,
        D: IntoIterator,
        D::Item: Into<ElementId>,
    {
        Self {
            selected_element_ids: selected.into_iter().map(Into::into).collect(),
            deselected_element_ids: deselected.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request to select or deselect every selectable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectAllAction {
    pub select: bool,
}

impl SelectAllAction {
    pub const KIND: &'static str = "allSelected";

    #[must_use]
    pub fn new(select: bool) -> Self {
        Self { select }
    }
}

// =============================================================================
// SELECT
// =============================================================================

/// One element touched by a `SelectCommand`, with its state before and after.
#[derive(Debug, Clone)]
struct SelectionChange {
    id: ElementId,
    parent: ElementId,
    was_selected: bool,
    was_index: usize,
    now_selected: bool,
}

impl SelectionChange {
    /// Became selected, and therefore moves to the end of its siblings.
    fn moves(&self) -> bool {
        !self.was_selected && self.now_selected
    }
}

#[derive(Debug)]
pub struct SelectCommand {
    action: SelectAction,
    lifecycle: Lifecycle,
    changes: Vec<SelectionChange>,
}

impl SelectCommand {
    const NAME: &'static str = "select";

    #[must_use]
    pub fn new(action: SelectAction) -> Self {
        Self { action, lifecycle: Lifecycle::default(), changes: Vec::new() }
    }

    fn capture(&self, root: &SceneRoot) -> Vec<SelectionChange> {
        let deselected: HashSet<&str> = self.action.deselected_element_ids.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let mut changes = Vec::new();

        let named = self.action.selected_element_ids.iter().chain(&self.action.deselected_element_ids);
        for id in named {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let Some(element) = root.index.get_by_id(id) else {
                tracing::trace!(command = Self::NAME, %id, "skipping unknown element");
                continue;
            };
            let (Some(was_selected), Some(parent), Some(was_index)) =
                (element.selected(), element.parent().map(str::to_string), root.index.index_of(id))
            else {
                tracing::trace!(command = Self::NAME, %id, "skipping element that cannot be selected");
                continue;
            };
            changes.push(SelectionChange {
                id: id.clone(),
                parent,
                was_selected,
                was_index,
                now_selected: !deselected.contains(id.as_str()),
            });
        }
        changes
    }

    fn apply(&self, root: &mut SceneRoot) {
        let mut moved: HashMap<&str, HashSet<ElementId>> = HashMap::new();
        for change in &self.changes {
            if let Some(element) = root.index.get_by_id_mut(&change.id) {
                element.set_selected(change.now_selected);
            }
            if change.moves() {
                moved.entry(change.parent.as_str()).or_default().insert(change.id.clone());
            }
        }
        for (parent, ids) in &moved {
            root.move_to_end(parent, ids);
        }
    }

    fn revert(&self, root: &mut SceneRoot) {
        for change in &self.changes {
            if let Some(element) = root.index.get_by_id_mut(&change.id) {
                element.set_selected(change.was_selected);
            }
        }
        // Ascending prior index: each reinsertion sees exactly the siblings
        // that preceded it before execute.
        let mut moved: Vec<&SelectionChange> = self.changes.iter().filter(|c| c.moves()).collect();
        moved.sort_by_key(|c| c.was_index);
        for change in moved {
            root.place_child(&change.parent, &change.id, change.was_index);
        }
    }
}

impl Command for SelectCommand {
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

        self.changes = self.capture(&ctx.root);
        self.apply(&mut ctx.root);
        tracing::debug!(
            command = Self::NAME,
            changed = self.changes.len(),
            moved = self.changes.iter().filter(|c| c.moves()).count(),
            "executed"
        );
        Ok(())
    }

    fn undo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Undo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        self.revert(&mut ctx.root);
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

// =============================================================================
// SELECT ALL
// =============================================================================

#[derive(Debug)]
pub struct SelectAllCommand {
    action: SelectAllAction,
    lifecycle: Lifecycle,
    previous: Vec<(ElementId, bool)>,
}

impl SelectAllCommand {
    const NAME: &'static str = "select-all";

    #[must_use]
    pub fn new(action: SelectAllAction) -> Self {
        Self { action, lifecycle: Lifecycle::default(), previous: Vec::new() }
    }

    /// Record every selectable element's flag, then overwrite it.
    fn apply(&mut self, root: &mut SceneRoot) {
        self.previous = root
            .walk()
            .into_iter()
            .filter_map(|e| e.selected().map(|selected| (e.id().to_string(), selected)))
            .collect();
        for (id, _) in &self.previous {
            if let Some(element) = root.index.get_by_id_mut(id) {
                element.set_selected(self.action.select);
            }
        }
    }
}

impl Command for SelectAllCommand {
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

        self.apply(&mut ctx.root);
        tracing::debug!(command = Self::NAME, select = self.action.select, changed = self.previous.len(), "executed");
        Ok(())
    }

    fn undo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Undo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        for (id, selected) in &self.previous {
            if let Some(element) = ctx.root.index.get_by_id_mut(id) {
                element.set_selected(*selected);
            }
        }
        tracing::debug!(command = Self::NAME, changed = self.previous.len(), "undone");
        Ok(())
    }

    fn redo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        self.lifecycle.advance(Self::NAME, CommandOp::Redo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        self.apply(&mut ctx.root);
        tracing::debug!(command = Self::NAME, select = self.action.select, changed = self.previous.len(), "redone");
        Ok(())
    }
}
