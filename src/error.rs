//! Error types for model construction and command execution.
//!
//! DESIGN
//! ======
//! Two enums, one per layer. `ModelError` covers building and querying the
//! scene graph; `CommandError` covers the execute/undo/redo lifecycle.
//! Commands never build or load models, so they have no model errors to
//! carry. Unknown ids inside actions are not errors either: commands skip
//! them. Every variant carries a grepable code via `ErrorCode`.

use crate::command::{CommandOp, CommandState};

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

// =============================================================================
// ERROR CODE
// =============================================================================

/// Stable machine-readable code for an error, independent of its message.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

// =============================================================================
// MODEL
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("duplicate element id: {0}")]
    DuplicateId(String),
    #[error("unknown element: {0}")]
    UnknownElement(String),
    #[error("invalid schema: {0}")]
    InvalidSchema(#[from] serde_json::Error),
}

impl ErrorCode for ModelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::UnknownElement(_) => "E_UNKNOWN_ELEMENT",
            Self::InvalidSchema(_) => "E_INVALID_SCHEMA",
        }
    }
}

// =============================================================================
// COMMAND
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Caller error: the command was asked to `operation` while in `state`.
    #[error("{command}: cannot {operation} a command that is {state}")]
    OutOfSequence { command: &'static str, operation: CommandOp, state: CommandState },
}

impl ErrorCode for CommandError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfSequence { .. } => "E_OUT_OF_SEQUENCE",
        }
    }
}
