//! Diagram configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::str::FromStr;

use crate::consts::{DEFAULT_ANIMATION_DURATION_MS, DEFAULT_FIT_PADDING, DEFAULT_UNDO_HISTORY_LIMIT};

pub const ENV_UNDO_HISTORY_LIMIT: &str = "DIAGRAM_UNDO_HISTORY_LIMIT";
pub const ENV_ANIMATION_DURATION_MS: &str = "DIAGRAM_ANIMATION_DURATION_MS";
pub const ENV_FIT_PADDING: &str = "DIAGRAM_FIT_PADDING";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Maximum number of commands kept on the undo stack (and on the redo stack).
    pub undo_history_limit: usize,
    /// Logical duration handed to every command, in milliseconds.
    pub animation_duration_ms: u64,
    /// Padding used by fit-to-screen when the action names none.
    pub fit_padding: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            undo_history_limit: DEFAULT_UNDO_HISTORY_LIMIT,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            fit_padding: DEFAULT_FIT_PADDING,
        }
    }
}

impl DiagramConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `DIAGRAM_UNDO_HISTORY_LIMIT`: default 100
    /// - `DIAGRAM_ANIMATION_DURATION_MS`: default 250
    /// - `DIAGRAM_FIT_PADDING`: default 0
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env_value(key, std::env::var(key)))
    }

    /// Build config from any key → value source. Missing or unparseable
    /// values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            undo_history_limit: parse_or(&lookup, ENV_UNDO_HISTORY_LIMIT, defaults.undo_history_limit),
            animation_duration_ms: parse_or(&lookup, ENV_ANIMATION_DURATION_MS, defaults.animation_duration_ms),
            fit_padding: parse_or(&lookup, ENV_FIT_PADDING, defaults.fit_padding),
        }
    }
}

/// An unset variable is `None`; a non-unicode one is `None` with a warning.
fn env_value(key: &str, var: Result<String, VarError>) -> Option<String> {
    match var {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(e @ VarError::NotUnicode(_)) => {
            tracing::warn!(key, error = %e, "ignoring non-unicode config value, using default");
            None
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key, value = %raw, ?default, "invalid config value, using default");
            default
        }
    }
}
