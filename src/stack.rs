//! Command stack: the single owner of the model, with undo/redo history.
//!
//! DESIGN
//! ======
//! All mutation goes through one `CommandStack`, so at most one command is
//! in flight and execute/undo/redo happen in the order they are requested.
//! Hosts that receive actions from several sources must funnel them into
//! the stack from one consumer.
//!
//! Executing a command pushes it on the undo stack and clears the redo
//! stack. Both stacks are capped at `undo_history_limit`; the oldest entry
//! is dropped when the cap is reached. A command that fails is not recorded
//! and leaves the model unchanged.
//!
//! After every successful operation the frame clock advances and the change
//! listener is told what happened.

#[cfg(test)]
#[path = "stack_test.rs"]
mod stack_test;

use std::collections::VecDeque;
use std::fmt;

use crate::action::Action;
use crate::command::{
    AnimationFrameSyncer, Command, CommandExecutionContext, CommandOp, LogicalClock, ModelChange, ModelChangeListener,
    NoopListener,
};
use crate::config::DiagramConfig;
use crate::error::{CommandError, ModelError};
use crate::factory::ModelFactory;
use crate::model::SceneRoot;
use crate::schema::ElementSchema;

pub struct CommandStack {
    root: SceneRoot,
    factory: Box<dyn ModelFactory>,
    listener: Box<dyn ModelChangeListener>,
    syncer: Box<dyn AnimationFrameSyncer>,
    config: DiagramConfig,
    span: tracing::Span,
    undo_stack: VecDeque<Box<dyn Command>>,
    redo_stack: VecDeque<Box<dyn Command>>,
}

impl CommandStack {
    /// Create a stack holding the empty root.
    #[must_use]
    pub fn new(factory: impl ModelFactory + 'static, config: DiagramConfig) -> Self {
        Self {
            root: SceneRoot::default(),
            factory: Box::new(factory),
            listener: Box::new(NoopListener),
            syncer: Box::new(LogicalClock::new()),
            config,
            span: tracing::debug_span!("command_stack"),
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_listener(mut self, listener: impl ModelChangeListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    #[must_use]
    pub fn with_syncer(mut self, syncer: impl AnimationFrameSyncer + 'static) -> Self {
        self.syncer = Box::new(syncer);
        self
    }

    // --- Queries ---

    #[must_use]
    pub fn root(&self) -> &SceneRoot {
        &self.root
    }

    #[must_use]
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// Current model as a schema tree.
    #[must_use]
    pub fn schema(&self) -> ElementSchema {
        self.factory.create_schema(&self.root)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    // --- Mutations ---

    /// Replace the model with one built from `schema` and forget all history.
    ///
    /// # Errors
    ///
    /// Returns the factory's error if the schema is invalid; the current
    /// model and history are kept in that case.
    pub fn set_model(&mut self, schema: &ElementSchema) -> Result<(), ModelError> {
        let root = self.factory.create_root(schema)?;
        tracing::debug!(parent: &self.span, root = %root.id(), elements = root.index.len(), "model replaced");
        self.root = root;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(())
    }

    /// Execute a fresh command and record it for undo.
    ///
    /// # Errors
    ///
    /// Returns the command's error; nothing is recorded in that case.
    pub fn execute(&mut self, mut command: Box<dyn Command>) -> Result<(), CommandError> {
        self.run(command.as_mut(), CommandOp::Execute)?;
        Self::push_capped(&mut self.undo_stack, command, self.config.undo_history_limit);
        self.redo_stack.clear();
        Ok(())
    }

    /// Undo the most recent command. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns the command's error; the command stays on the undo stack.
    pub fn undo(&mut self) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = self.run(command.as_mut(), CommandOp::Undo) {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        Self::push_capped(&mut self.redo_stack, command, self.config.undo_history_limit);
        Ok(true)
    }

    /// Redo the most recently undone command. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns the command's error; the command stays on the redo stack.
    pub fn redo(&mut self) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = self.run(command.as_mut(), CommandOp::Redo) {
            self.redo_stack.push_back(command);
            return Err(e);
        }
        Self::push_capped(&mut self.undo_stack, command, self.config.undo_history_limit);
        Ok(true)
    }

    /// Handle an action. Returns whether the model was touched.
    ///
    /// # Errors
    ///
    /// Returns the error of the command the action maps to.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, CommandError> {
        tracing::trace!(parent: &self.span, kind = action.kind(), "dispatching action");
        match action {
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            other => match other.into_command(&self.config) {
                Some(command) => self.execute(command).map(|()| true),
                None => Ok(false),
            },
        }
    }

    // --- Internals ---

    fn run(&mut self, command: &mut dyn Command, op: CommandOp) -> Result<(), CommandError> {
        let mut ctx = CommandExecutionContext {
            root: std::mem::take(&mut self.root),
            model_factory: self.factory.as_ref(),
            duration: self.config.animation_duration_ms,
            model_changed: self.listener.as_ref(),
            span: self.span.clone(),
            syncer: self.syncer.as_ref(),
        };
        let result = match op {
            CommandOp::Execute => command.execute(&mut ctx),
            CommandOp::Undo => command.undo(&mut ctx),
            CommandOp::Redo => command.redo(&mut ctx),
        };
        self.root = ctx.root;
        if let Err(e) = result {
            tracing::warn!(parent: &self.span, command = command.name(), operation = %op, error = %e, "command failed");
            return Err(e);
        }

        let change = ModelChange { operation: op, command: command.name(), frame: self.syncer.next_frame() };
        self.listener.model_changed(&self.root, &change);
        Ok(())
    }

    fn push_capped(stack: &mut VecDeque<Box<dyn Command>>, command: Box<dyn Command>, limit: usize) {
        if limit == 0 {
            return;
        }
        while stack.len() >= limit {
            stack.pop_front();
        }
        stack.push_back(command);
    }
}

impl fmt::Debug for CommandStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandStack")
            .field("root", &self.root.id())
            .field("config", &self.config)
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .finish_non_exhaustive()
    }
}
