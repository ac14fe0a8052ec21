//! Scene graph: identifiable elements in an ordered tree, plus the id index.
//!
//! DESIGN
//! ======
//! Elements live flat in a `SceneIndex` keyed by id; the tree is expressed by
//! each element's `parent` and ordered `children` ids. Lookup by id is a
//! single map access, and reordering siblings only touches the parent's
//! child list. Child order is the render order: later children draw on top.
//!
//! What an element can do is carried by its `Capabilities`. A capability is
//! present exactly when its slot is `Some`, and the slot holds the state that
//! capability enables (the selected flag, the position, ...). Commands check
//! capabilities at run time instead of matching on element kinds.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ZOOM, EMPTY_ROOT_ID, EMPTY_ROOT_KIND};
use crate::error::ModelError;
use crate::geometry::{Bounds, Dimension, Point};

/// Identifier of an element, unique within one tree.
pub type ElementId = String;

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Capability tags an element may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    /// Has a `selected` flag.
    Select,
    /// Has a position that move commands may change.
    Move,
    /// Has a size, and thus bounds.
    Bounds,
    /// Has a scroll offset and zoom factor.
    Viewport,
}

/// Scroll offset and zoom of a viewport element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub scroll: Point,
    pub zoom: f64,
}

impl ViewportState {
    /// Finite scroll and a finite, positive zoom.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.zoom.is_finite() && self.zoom > 0.0 && self.scroll.x.is_finite() && self.scroll.y.is_finite()
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { scroll: Point::ORIGIN, zoom: DEFAULT_ZOOM }
    }
}

/// Per-element capability slots. `Some` means the capability is supported.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Capabilities {
    pub select: Option<bool>,
    pub position: Option<Point>,
    pub size: Option<Dimension>,
    pub viewport: Option<ViewportState>,
}

impl Capabilities {
    /// Enable the given features with their initial state.
    #[must_use]
    pub fn with_features(features: &[Feature]) -> Self {
        let mut caps = Self::default();
        for feature in features {
            match feature {
                Feature::Select => caps.select = Some(false),
                Feature::Move => caps.position = Some(Point::ORIGIN),
                Feature::Bounds => caps.size = Some(Dimension::EMPTY),
                Feature::Viewport => caps.viewport = Some(ViewportState::default()),
            }
        }
        caps
    }

    #[must_use]
    pub fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::Select => self.select.is_some(),
            Feature::Move => self.position.is_some(),
            Feature::Bounds => self.size.is_some(),
            Feature::Viewport => self.viewport.is_some(),
        }
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

/// One node of the scene graph.
///
/// Id and tree links are read-only outside this module. A `SceneRoot` sets
/// them when the element joins it and only its reordering operations change
/// them afterwards.
///
/// ```compile_fail
/// let mut root = diagram::model::SceneRoot::default();
/// if let Some(element) = root.index.get_by_id_mut("EMPTY") {
///     element.id = "renamed".to_string();
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    id: ElementId,
    pub kind: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    pub capabilities: Capabilities,
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl SceneElement {
    #[must_use]
    pub fn new(id: impl Into<ElementId>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            parent: None,
            children: Vec::new(),
            capabilities: Capabilities::default(),
            props: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the parent, or `None` for a root or an element not yet in a tree.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Child ids in render order.
    #[must_use]
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    #[must_use]
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.capabilities.has(feature)
    }

    /// Selected flag, or `None` if the element is not selectable.
    #[must_use]
    pub fn selected(&self) -> Option<bool> {
        self.capabilities.select
    }

    /// Set the selected flag. Returns `false` if the element is not selectable.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        match self.capabilities.select.as_mut() {
            Some(flag) => {
                *flag = selected;
                true
            }
            None => false,
        }
    }

    /// Position, or `None` if the element is not moveable.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.capabilities.position
    }

    /// Set the position. Returns `false` if the element is not moveable.
    pub fn set_position(&mut self, position: Point) -> bool {
        match self.capabilities.position.as_mut() {
            Some(p) => {
                *p = position;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn size(&self) -> Option<Dimension> {
        self.capabilities.size
    }

    /// Set the size. Returns `false` if the element is not bounds-aware.
    pub fn set_size(&mut self, size: Dimension) -> bool {
        match self.capabilities.size.as_mut() {
            Some(s) => {
                *s = size;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Option<ViewportState> {
        self.capabilities.viewport
    }

    /// Set scroll and zoom. Returns `false` if the element has no viewport.
    pub fn set_viewport(&mut self, viewport: ViewportState) -> bool {
        match self.capabilities.viewport.as_mut() {
            Some(v) => {
                *v = viewport;
                true
            }
            None => false,
        }
    }

    /// Bounds in the parent's coordinates, or `EMPTY` if the element has no size.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self.capabilities.size {
            Some(size) => Bounds::from_parts(self.capabilities.position.unwrap_or_default(), size),
            None => Bounds::EMPTY,
        }
    }
}

// =============================================================================
// INDEX
// =============================================================================

/// Id → element map for one tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneIndex {
    elements: HashMap<ElementId, SceneElement>,
}

impl SceneIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if an element with the same id is already indexed.
    pub fn insert(&mut self, element: SceneElement) -> Result<(), ModelError> {
        if self.elements.contains_key(&element.id) {
            return Err(ModelError::DuplicateId(element.id));
        }
        self.elements.insert(element.id.clone(), element);
        Ok(())
    }

    /// Look up an element. Absence is not an error.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&SceneElement> {
        self.elements.get(id)
    }

    pub fn get_by_id_mut(&mut self, id: &str) -> Option<&mut SceneElement> {
        self.elements.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<&SceneElement> {
        let parent = self.elements.get(id)?.parent.as_deref()?;
        self.elements.get(parent)
    }

    /// Position of `id` among its siblings, or `None` for unknown ids and roots.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.parent_of(id)?.children.iter().position(|c| c == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// =============================================================================
// ROOT
// =============================================================================

/// Root of a scene graph together with the index of all its elements.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRoot {
    id: ElementId,
    pub index: SceneIndex,
}

impl SceneRoot {
    /// Start a tree from its root element. The element must have no children yet.
    #[must_use]
    pub fn new(mut root: SceneElement) -> Self {
        root.parent = None;
        root.children.clear();
        let id = root.id.clone();
        let mut elements = HashMap::new();
        elements.insert(id.clone(), root);
        Self { id, index: SceneIndex { elements } }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn element(&self) -> Option<&SceneElement> {
        self.index.get_by_id(&self.id)
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownElement` if `parent` is not in the tree and
    /// `DuplicateId` if the child's id is taken.
    pub fn add_child(&mut self, parent: &str, mut child: SceneElement) -> Result<(), ModelError> {
        if !self.index.contains(parent) {
            return Err(ModelError::UnknownElement(parent.to_string()));
        }
        let child_id = child.id.clone();
        child.parent = Some(parent.to_string());
        child.children.clear();
        self.index.insert(child)?;
        if let Some(p) = self.index.get_by_id_mut(parent) {
            p.children.push(child_id);
        }
        Ok(())
    }

    /// Child ids of `id` in render order. Empty for unknown ids.
    #[must_use]
    pub fn children(&self, id: &str) -> &[ElementId] {
        self.index.get_by_id(id).map_or(&[], |e| e.children.as_slice())
    }

    /// All elements in pre-order, children visited in render order.
    #[must_use]
    pub fn walk(&self) -> Vec<&SceneElement> {
        let mut out = Vec::with_capacity(self.index.len());
        let mut stack = vec![self.id.as_str()];
        while let Some(id) = stack.pop() {
            let Some(element) = self.index.get_by_id(id) else {
                continue;
            };
            out.push(element);
            stack.extend(element.children.iter().rev().map(String::as_str));
        }
        out
    }

    /// Move the children of `parent` named in `ids` to the end of its child
    /// list. Moved children keep their relative order, as do the others.
    pub fn move_to_end(&mut self, parent: &str, ids: &HashSet<ElementId>) {
        let Some(p) = self.index.get_by_id_mut(parent) else {
            return;
        };
        let (moved, mut kept): (Vec<ElementId>, Vec<ElementId>) =
            p.children.drain(..).partition(|c| ids.contains(c));
        kept.extend(moved);
        p.children = kept;
    }

    /// Put child `id` of `parent` back at `index`, clamped to the child count.
    pub fn place_child(&mut self, parent: &str, id: &str, index: usize) {
        let Some(p) = self.index.get_by_id_mut(parent) else {
            return;
        };
        let Some(current) = p.children.iter().position(|c| c == id) else {
            return;
        };
        let child = p.children.remove(current);
        let index = index.min(p.children.len());
        p.children.insert(index, child);
    }
}

impl Default for SceneRoot {
    fn default() -> Self {
        Self::new(SceneElement::new(EMPTY_ROOT_ID, EMPTY_ROOT_KIND))
    }
}
