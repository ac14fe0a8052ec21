//! Shared constants for the diagram crate.

// ── Empty model ─────────────────────────────────────────────────

/// Id of the placeholder root used before any model has been loaded.
pub const EMPTY_ROOT_ID: &str = "EMPTY";

/// Kind of the placeholder root used before any model has been loaded.
pub const EMPTY_ROOT_KIND: &str = "NONE";

// ── Command stack ───────────────────────────────────────────────

/// Default number of commands kept on each of the undo and redo stacks.
pub const DEFAULT_UNDO_HISTORY_LIMIT: usize = 100;

/// Default logical duration handed to commands, in milliseconds.
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 250;

// ── Viewport ────────────────────────────────────────────────────

/// Default padding around the fitted bounds for fit-to-screen, in model units.
pub const DEFAULT_FIT_PADDING: f64 = 0.0;

/// Zoom factor of a freshly created viewport.
pub const DEFAULT_ZOOM: f64 = 1.0;
