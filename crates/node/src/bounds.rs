//! Axis-aligned bounding boxes in canvas space.
//!
//! Nodes never rotate, so every box on the canvas is axis-aligned and the
//! containment tests reduce to four comparisons.

use crate::coords::{CanvasDelta, CanvasPoint, CanvasSize};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box represented by minimum and maximum points
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// The minimum point (top-left)
    pub min: Vec2,
    /// The maximum point (bottom-right)
    pub max: Vec2,
}

impl Bounds {
    /// Creates bounds from a canvas-space origin and size
    pub fn from_origin_size(origin: CanvasPoint, size: CanvasSize) -> Self {
        Self {
            min: origin.0,
            max: origin.0 + size.0,
        }
    }

    pub fn origin(&self) -> CanvasPoint {
        CanvasPoint(self.min)
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize(self.max - self.min)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Tests if `other` lies strictly inside this box.
    ///
    /// All four edges of `other` must be inside; touching an edge does not
    /// count, and neither does partial overlap.
    pub fn strictly_contains(&self, other: &Self) -> bool {
        other.min.x > self.min.x
            && other.max.x < self.max.x
            && other.min.y > self.min.y
            && other.max.y < self.max.y
    }

    /// Two bounds intersect if they overlap in both X and Y axes
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn translate(&self, delta: CanvasDelta) -> Self {
        Self {
            min: self.min + delta.0,
            max: self.max + delta.0,
        }
    }
}
