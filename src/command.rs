//! Reversible commands and the context they run in.
//!
//! DESIGN
//! ======
//! A command mutates `ctx.root` in place and captures, while executing,
//! whatever it needs to reverse itself. Undo never replays history; it only
//! applies the captured deltas. The post-command model is `ctx.root`.
//!
//! Every command walks the same state machine:
//!
//! ```text
//! Unexecuted --execute--> Executed --undo--> Undone --redo--> Executed
//! ```
//!
//! Calling an operation from any other state is a caller error. `Lifecycle`
//! rejects it with `CommandError::OutOfSequence` before anything is touched.
//!
//! Commands run to completion on the caller's thread. Serializing them is the
//! job of the single owner of the model (see `CommandStack`).

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use std::cell::Cell;
use std::fmt;

use crate::error::CommandError;
use crate::factory::ModelFactory;
use crate::model::SceneRoot;

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Which of the three command operations is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOp {
    Execute,
    Undo,
    Redo,
}

impl fmt::Display for CommandOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Execute => "execute",
            Self::Undo => "undo",
            Self::Redo => "redo",
        })
    }
}

/// Where a command is in its execute/undo/redo cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Unexecuted,
    Executed,
    Undone,
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unexecuted => "unexecuted",
            Self::Executed => "executed",
            Self::Undone => "undone",
        })
    }
}

/// Guard for the command state machine, embedded in every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lifecycle {
    state: CommandState,
}

impl Lifecycle {
    #[must_use]
    pub fn state(&self) -> CommandState {
        self.state
    }

    /// Move to the state `op` leads to.
    ///
    /// # Errors
    ///
    /// Returns `OutOfSequence` (leaving the state unchanged) if `op` is not
    /// allowed from the current state.
    pub fn advance(&mut self, command: &'static str, op: CommandOp) -> Result<(), CommandError> {
        let next = match (self.state, op) {
            (CommandState::Unexecuted, CommandOp::Execute) => CommandState::Executed,
            (CommandState::Executed, CommandOp::Undo) => CommandState::Undone,
            (CommandState::Undone, CommandOp::Redo) => CommandState::Executed,
            (state, operation) => return Err(CommandError::OutOfSequence { command, operation, state }),
        };
        self.state = next;
        Ok(())
    }
}

// =============================================================================
// COLLABORATORS
// =============================================================================

/// What happened to the model, passed to change listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChange {
    pub operation: CommandOp,
    pub command: &'static str,
    /// Logical frame the change became visible in.
    pub frame: u64,
}

/// Notified after the model owner finishes an operation.
pub trait ModelChangeListener {
    fn model_changed(&self, root: &SceneRoot, change: &ModelChange);
}

/// Listener that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl ModelChangeListener for NoopListener {
    fn model_changed(&self, _root: &SceneRoot, _change: &ModelChange) {}
}

/// Source of animation frames. Only the frame count is modelled.
pub trait AnimationFrameSyncer {
    /// Advance to the next frame and return its number.
    fn next_frame(&self) -> u64;

    /// The most recently issued frame number.
    fn current_frame(&self) -> u64;
}

/// Frame counter that advances only when asked.
#[derive(Debug, Default)]
pub struct LogicalClock {
    frame: Cell<u64>,
}

impl LogicalClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnimationFrameSyncer for LogicalClock {
    fn next_frame(&self) -> u64 {
        let next = self.frame.get() + 1;
        self.frame.set(next);
        next
    }

    fn current_frame(&self) -> u64 {
        self.frame.get()
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Everything a command invocation may use.
pub struct CommandExecutionContext<'a> {
    /// Current model. Commands mutate it in place.
    pub root: SceneRoot,
    pub model_factory: &'a dyn ModelFactory,
    /// Logical duration of the transition, in milliseconds.
    pub duration: u64,
    pub model_changed: &'a dyn ModelChangeListener,
    /// Span that command log events are recorded in.
    pub span: tracing::Span,
    pub syncer: &'a dyn AnimationFrameSyncer,
}

impl fmt::Debug for CommandExecutionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandExecutionContext")
            .field("root", &self.root.id())
            .field("duration", &self.duration)
            .field("frame", &self.syncer.current_frame())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// COMMAND
// =============================================================================

/// A reversible model mutation.
pub trait Command: fmt::Debug {
    /// Short name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Where the command is in its lifecycle.
    fn state(&self) -> CommandState;

    /// Apply the command for the first time, capturing what undo needs.
    ///
    /// # Errors
    ///
    /// Returns `OutOfSequence` unless the command is unexecuted.
    fn execute(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError>;

    /// Restore the model as it was right before `execute`.
    ///
    /// # Errors
    ///
    /// Returns `OutOfSequence` unless the command is executed.
    fn undo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError>;

    /// Reapply the command after an undo.
    ///
    /// # Errors
    ///
    /// Returns `OutOfSequence` unless the command is undone.
    fn redo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError>;
}
