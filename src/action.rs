//! Actions: the serializable requests that become commands.
//!
//! Actions travel as JSON objects tagged by `kind`, e.g.
//! `{"kind":"elementSelected","selectedElementsIDs":["n1"],"deselectedElementsIDs":[]}`.
//! `Undo` and `Redo` address the command stack itself and map to no command.

#[cfg(test)]
#[path = "action_test.rs"]
mod action_test;

use serde::{Deserialize, Serialize};

use crate::bounds::{SetBoundsAction, SetBoundsCommand};
use crate::command::Command;
use crate::config::DiagramConfig;
use crate::movement::{MoveAction, MoveCommand};
use crate::select::{SelectAction, SelectAllAction, SelectAllCommand, SelectCommand};
use crate::viewport::{CenterAction, FitToScreenAction, ViewportAction, ViewportCommand};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Action {
    #[serde(rename = "elementSelected")]
    Select(SelectAction),
    #[serde(rename = "allSelected")]
    SelectAll(SelectAllAction),
    #[serde(rename = "move")]
    Move(MoveAction),
    #[serde(rename = "setBounds")]
    SetBounds(SetBoundsAction),
    #[serde(rename = "viewport")]
    Viewport(ViewportAction),
    #[serde(rename = "center")]
    Center(CenterAction),
    #[serde(rename = "fit")]
    Fit(FitToScreenAction),
    #[serde(rename = "undo")]
    Undo,
    #[serde(rename = "redo")]
    Redo,
}

impl Action {
    /// Wire tag of this action.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => SelectAction::KIND,
            Self::SelectAll(_) => SelectAllAction::KIND,
            Self::Move(_) => MoveAction::KIND,
            Self::SetBounds(_) => SetBoundsAction::KIND,
            Self::Viewport(_) => ViewportAction::KIND,
            Self::Center(_) => CenterAction::KIND,
            Self::Fit(_) => FitToScreenAction::KIND,
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// The command that carries out this action, or `None` for undo/redo.
    #[must_use]
    pub fn into_command(self, config: &DiagramConfig) -> Option<Box<dyn Command>> {
        let command: Box<dyn Command> = match self {
            Self::Select(a) => Box::new(SelectCommand::new(a)),
            Self::SelectAll(a) => Box::new(SelectAllCommand::new(a)),
            Self::Move(a) => Box::new(MoveCommand::new(a)),
            Self::SetBounds(a) => Box::new(SetBoundsCommand::new(a)),
            Self::Viewport(a) => Box::new(ViewportCommand::set(a)),
            Self::Center(a) => Box::new(ViewportCommand::center(a)),
            Self::Fit(a) => Box::new(ViewportCommand::fit(a, config.fit_padding)),
            Self::Undo | Self::Redo => return None,
        };
        Some(command)
    }
}
