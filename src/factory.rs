//! Building scene graphs from schemas and back.
//!
//! DESIGN
//! ======
//! `GraphModelFactory` decides capabilities from the element kind. The part
//! of the kind before the first `:` is its base (`node:circle` → `node`), and
//! each base maps to a fixed feature list. Explicit per-kind registrations
//! take precedence over the base rules, which is how applications give their
//! own element kinds selection or bounds.

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

use std::collections::HashMap;

use crate::error::ModelError;
use crate::geometry::{Dimension, Point};
use crate::model::{Capabilities, Feature, SceneElement, SceneRoot};
use crate::schema::ElementSchema;

/// Converts between serializable schemas and live scene graphs.
pub trait ModelFactory {
    /// Build a fresh scene graph from a schema tree.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if two elements in the schema share an id.
    fn create_root(&self, schema: &ElementSchema) -> Result<SceneRoot, ModelError>;

    /// Describe the current state of a scene graph as a schema tree.
    fn create_schema(&self, root: &SceneRoot) -> ElementSchema;
}

/// Factory for node/edge graphs.
#[derive(Debug, Clone, Default)]
pub struct GraphModelFactory {
    overrides: HashMap<String, Vec<Feature>>,
}

impl GraphModelFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Give elements of exactly `kind` the listed features.
    #[must_use]
    pub fn with_features(mut self, kind: impl Into<String>, features: &[Feature]) -> Self {
        self.overrides.insert(kind.into(), features.to_vec());
        self
    }

    /// Features an element of `kind` is created with.
    #[must_use]
    pub fn features_for(&self, kind: &str) -> Vec<Feature> {
        if let Some(features) = self.overrides.get(kind) {
            return features.clone();
        }
        let base = kind.split(':').next().unwrap_or(kind);
        match base {
            "graph" => vec![Feature::Viewport, Feature::Bounds],
            "node" => vec![Feature::Select, Feature::Move, Feature::Bounds],
            "edge" => vec![Feature::Select],
            "port" => vec![Feature::Select, Feature::Bounds],
            "label" => vec![Feature::Bounds],
            _ => Vec::new(),
        }
    }

    fn create_element(&self, schema: &ElementSchema) -> SceneElement {
        let mut caps = Capabilities::with_features(&self.features_for(&schema.kind));
        if let Some(selected) = caps.select.as_mut() {
            *selected = schema.selected.unwrap_or(false);
        }
        if let Some(position) = caps.position.as_mut() {
            *position = Point::new(schema.x.unwrap_or(0.0), schema.y.unwrap_or(0.0));
        }
        if let Some(size) = caps.size.as_mut() {
            *size = Dimension::new(
                schema.width.unwrap_or(Dimension::EMPTY.width),
                schema.height.unwrap_or(Dimension::EMPTY.height),
            );
        }
        if let Some(viewport) = caps.viewport.as_mut() {
            if let Some(scroll) = schema.scroll {
                viewport.scroll = scroll;
            }
            if let Some(zoom) = schema.zoom {
                viewport.zoom = zoom;
            }
        }

        let mut element = SceneElement::new(schema.id.clone(), schema.kind.clone());
        element.capabilities = caps;
        element.props = schema.props.clone();
        element
    }

    fn add_subtree(&self, root: &mut SceneRoot, parent: &str, schema: &ElementSchema) -> Result<(), ModelError> {
        root.add_child(parent, self.create_element(schema))?;
        for child in &schema.children {
            self.add_subtree(root, &schema.id, child)?;
        }
        Ok(())
    }

    fn describe(root: &SceneRoot, element: &SceneElement) -> ElementSchema {
        let caps = &element.capabilities;
        let children = element
            .children()
            .iter()
            .filter_map(|id| root.index.get_by_id(id))
            .map(|child| Self::describe(root, child))
            .collect();
        let mut schema = ElementSchema::new(element.id(), element.kind.clone()).with_children(children);
        schema.selected = caps.select;
        if let Some(p) = caps.position {
            schema.x = Some(p.x);
            schema.y = Some(p.y);
        }
        if let Some(size) = caps.size.filter(Dimension::is_valid) {
            schema.width = Some(size.width);
            schema.height = Some(size.height);
        }
        if let Some(viewport) = caps.viewport {
            schema.scroll = Some(viewport.scroll);
            schema.zoom = Some(viewport.zoom);
        }
        schema.props = element.props.clone();
        schema
    }
}

impl ModelFactory for GraphModelFactory {
    fn create_root(&self, schema: &ElementSchema) -> Result<SceneRoot, ModelError> {
        let mut root = SceneRoot::new(self.create_element(schema));
        for child in &schema.children {
            self.add_subtree(&mut root, &schema.id, child)?;
        }
        tracing::trace!(root = %schema.id, elements = root.index.len(), "created scene root");
        Ok(root)
    }

    fn create_schema(&self, root: &SceneRoot) -> ElementSchema {
        match root.element() {
            Some(element) => Self::describe(root, element),
            None => ElementSchema::empty_root(),
        }
    }
}
