//! Points, dimensions, and axis-aligned bounds in model coordinates.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

/// A point in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of an element. Negative values mark an unknown size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    /// Size of an element that has not been measured yet.
    pub const EMPTY: Self = Self { width: -1.0, height: -1.0 };

    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both extents are non-negative.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Bounds of nothing. Neutral element for [`Bounds::combine`].
    pub const EMPTY: Self = Self { x: 0.0, y: 0.0, width: -1.0, height: -1.0 };

    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    #[must_use]
    pub fn from_parts(position: Point, size: Dimension) -> Self {
        Self { x: position.x, y: position.y, width: size.width, height: size.height }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn size(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.size().is_valid()
    }

    /// Valid and covering a non-zero area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + 0.5 * self.width, self.y + 0.5 * self.height)
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }

    /// Smallest bounds containing both. Invalid operands are ignored.
    #[must_use]
    pub fn combine(&self, other: &Self) -> Self {
        if !other.is_valid() {
            return *self;
        }
        if !self.is_valid() {
            return *other;
        }
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = (self.x + self.width).max(other.x + other.width);
        let max_y = (self.y + self.height).max(other.y + other.height);
        Self { x: min_x, y: min_y, width: max_x - min_x, height: max_y - min_y }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}
