//! Plain-data description of a scene graph, as exchanged with a diagram server.
//!
//! A schema is a serde tree of `{ id, type, children, ... }` objects. The
//! optional fields feed element capabilities when a factory builds a
//! `SceneRoot`; anything else is kept verbatim in `props`.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use serde::{Deserialize, Serialize};

use crate::consts::{EMPTY_ROOT_ID, EMPTY_ROOT_KIND};
use crate::error::ModelError;
use crate::geometry::Point;

/// Serializable description of one element and its subtree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementSchema {
    pub id: String,
    /// Element kind, e.g. `"graph"` or `"node:circle"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    /// Fields with no built-in meaning, preserved for round-trips.
    #[serde(flatten)]
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl ElementSchema {
    /// A childless element with only id and kind set.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self { id: id.into(), kind: kind.into(), ..Self::default() }
    }

    /// The placeholder root shown before a real model arrives.
    #[must_use]
    pub fn empty_root() -> Self {
        Self::new(EMPTY_ROOT_ID, EMPTY_ROOT_KIND)
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<ElementSchema>) -> Self {
        self.children = children;
        self
    }

    /// Parse a schema from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` if the value is not a well-formed element tree.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ModelError> {
        Ok(serde_json::from_value(value)?)
    }
}
