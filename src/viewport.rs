//! Viewport commands: set, center, and fit-to-screen.
//!
//! DESIGN
//! ======
//! The root's size is the canvas the diagram is shown in; its viewport state
//! says which part of the model is visible. Centering keeps the zoom and
//! scrolls so the target bounds sit in the middle of the canvas. Fitting also
//! picks the largest zoom at which the padded bounds still fit, optionally
//! capped. Targets without usable bounds leave the viewport unchanged.
//!
//! All three requests share one command type: each resolves to a single
//! old → new viewport change on one element, which undo reverses.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::bounds::diagram_bounds;
use crate::command::{Command, CommandExecutionContext, CommandOp, CommandState, Lifecycle};
use crate::error::CommandError;
use crate::geometry::{Bounds, Dimension, Point};
use crate::model::{ElementId, SceneRoot, ViewportState};

// =============================================================================
// ACTIONS
// =============================================================================

/// Set the scroll and zoom of a viewport element directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportAction {
    pub element_id: ElementId,
    pub new_viewport: ViewportState,
    #[serde(default)]
    pub animate: bool,
}

impl ViewportAction {
    pub const KIND: &'static str = "viewport";
}

/// Scroll the root so the named elements (all, if empty) are centered.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterAction {
    #[serde(default)]
    pub element_ids: Vec<ElementId>,
    #[serde(default)]
    pub animate: bool,
}

impl CenterAction {
    pub const KIND: &'static str = "center";
}

/// Zoom and scroll the root so the named elements (all, if empty) fill the canvas.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitToScreenAction {
    #[serde(default)]
    pub element_ids: Vec<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
    #[serde(default)]
    pub animate: bool,
}

impl FitToScreenAction {
    pub const KIND: &'static str = "fit";
}

// =============================================================================
// VIEWPORT MATH
// =============================================================================

/// Scroll offset that puts `center` in the middle of `canvas` at `zoom`.
#[must_use]
pub fn centered_scroll(center: Point, canvas: Dimension, zoom: f64) -> Point {
    Point::new(center.x - 0.5 * canvas.width / zoom, center.y - 0.5 * canvas.height / zoom)
}

/// Viewport centering `target` without changing the zoom.
///
/// `None` when `current` has no finite positive zoom.
#[must_use]
pub fn center_viewport(current: ViewportState, target: Bounds, canvas: Dimension) -> Option<ViewportState> {
    if !current.is_usable() || !target.is_valid() || !canvas.is_valid() {
        return None;
    }
    Some(ViewportState { scroll: centered_scroll(target.center(), canvas, current.zoom), zoom: current.zoom })
}

/// Viewport fitting `target` plus `padding` on every side into `canvas`.
#[must_use]
pub fn fit_viewport(target: Bounds, canvas: Dimension, padding: f64, max_zoom: Option<f64>) -> Option<ViewportState> {
    if !target.has_area() || !canvas.is_valid() {
        return None;
    }
    let zoom_x = canvas.width / (target.width + 2.0 * padding);
    let zoom_y = canvas.height / (target.height + 2.0 * padding);
    let mut zoom = zoom_x.min(zoom_y);
    if let Some(max) = max_zoom {
        zoom = zoom.min(max);
    }
    if !zoom.is_finite() || zoom <= 0.0 {
        return None;
    }
    Some(ViewportState { scroll: centered_scroll(target.center(), canvas, zoom), zoom })
}

// =============================================================================
// COMMAND
// =============================================================================

#[derive(Debug, Clone)]
enum ViewportRequest {
    Set(ViewportAction),
    Center(CenterAction),
    Fit { action: FitToScreenAction, default_padding: f64 },
}

#[derive(Debug, Clone)]
struct ViewportChange {
    id: ElementId,
    old: ViewportState,
    new: ViewportState,
}

#[derive(Debug)]
pub struct ViewportCommand {
    request: ViewportRequest,
    lifecycle: Lifecycle,
    change: Option<ViewportChange>,
}

impl ViewportCommand {
    #[must_use]
    pub fn set(action: ViewportAction) -> Self {
        Self::from_request(ViewportRequest::Set(action))
    }

    #[must_use]
    pub fn center(action: CenterAction) -> Self {
        Self::from_request(ViewportRequest::Center(action))
    }

    /// `default_padding` applies when the action does not name a padding.
    #[must_use]
    pub fn fit(action: FitToScreenAction, default_padding: f64) -> Self {
        Self::from_request(ViewportRequest::Fit { action, default_padding })
    }

    fn from_request(request: ViewportRequest) -> Self {
        Self { request, lifecycle: Lifecycle::default(), change: None }
    }

    fn resolve(&self, root: &SceneRoot) -> Option<ViewportChange> {
        match &self.request {
            ViewportRequest::Set(action) => {
                let old = root.index.get_by_id(&action.element_id)?.viewport()?;
                if !action.new_viewport.is_usable() {
                    tracing::trace!(command = "viewport", element = %action.element_id, "skipping unusable viewport");
                    return None;
                }
                Some(ViewportChange { id: action.element_id.clone(), old, new: action.new_viewport })
            }
            ViewportRequest::Center(action) => {
                let element = root.element()?;
                let old = element.viewport()?;
                let canvas = element.size()?;
                let new = center_viewport(old, diagram_bounds(root, &action.element_ids), canvas)?;
                Some(ViewportChange { id: element.id().to_string(), old, new })
            }
            ViewportRequest::Fit { action, default_padding } => {
                let element = root.element()?;
                let old = element.viewport()?;
                let canvas = element.size()?;
                let padding = action.padding.unwrap_or(*default_padding);
                let target = diagram_bounds(root, &action.element_ids);
                let new = fit_viewport(target, canvas, padding, action.max_zoom)?;
                Some(ViewportChange { id: element.id().to_string(), old, new })
            }
        }
    }

    fn write(root: &mut SceneRoot, id: &str, viewport: ViewportState) {
        if let Some(element) = root.index.get_by_id_mut(id) {
            element.set_viewport(viewport);
        }
    }
}

impl Command for ViewportCommand {
    fn name(&self) -> &'static str {
        match self.request {
            ViewportRequest::Set(_) => "viewport",
            ViewportRequest::Center(_) => "center",
            ViewportRequest::Fit { .. } => "fit",
        }
    }

    fn state(&self) -> CommandState {
        self.lifecycle.state()
    }

    fn execute(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        let name = self.name();
        self.lifecycle.advance(name, CommandOp::Execute)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        self.change = self.resolve(&ctx.root);
        match &self.change {
            Some(change) => {
                Self::write(&mut ctx.root, &change.id, change.new);
                tracing::debug!(
                    command = name,
                    element = %change.id,
                    zoom = change.new.zoom,
                    scroll_x = change.new.scroll.x,
                    scroll_y = change.new.scroll.y,
                    duration = ctx.duration,
                    "executed"
                );
            }
            None => tracing::debug!(command = name, "no viewport change"),
        }
        Ok(())
    }

    fn undo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        let name = self.name();
        self.lifecycle.advance(name, CommandOp::Undo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        if let Some(change) = &self.change {
            Self::write(&mut ctx.root, &change.id, change.old);
        }
        tracing::debug!(command = name, "undone");
        Ok(())
    }

    fn redo(&mut self, ctx: &mut CommandExecutionContext<'_>) -> Result<(), CommandError> {
        let name = self.name();
        self.lifecycle.advance(name, CommandOp::Redo)?;
        let span = ctx.span.clone();
        let _entered = span.enter();

        if let Some(change) = &self.change {
            Self::write(&mut ctx.root, &change.id, change.new);
        }
        tracing::debug!(command = name, "redone");
        Ok(())
    }
}
