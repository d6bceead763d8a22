//! Type-safe coordinate system for the workflow canvas.
//!
//! Provides distinct types for different coordinate spaces to prevent
//! accidental mixing at compile time.
//!
//! # Coordinate Spaces
//!
//! - **Canvas space**: Where nodes live (infinite, pannable, zoomable)
//! - **Screen space**: Pixels relative to the canvas surface (after zoom/pan)
//! - **Local space**: Position relative to the containing stage's origin

use crate::NodeId;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in canvas space (where nodes live).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint(pub Vec2);

/// Position in screen space (pixels relative to the canvas surface, after zoom/pan).
///
/// Pointer events arrive in this space; the viewport converts them to
/// canvas space before anything touches the graph.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint(pub Vec2);

/// Position relative to a stage's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint(pub Vec2);

/// Size in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize(pub Vec2);

/// Movement/offset in canvas space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

/// Where a node sits, tagged with the frame the coordinates are in.
///
/// A node is either free on the canvas, or owned by a stage with its
/// offset measured from that stage's origin. Keeping the parent inside the
/// position makes it impossible to hold a parent reference alongside
/// absolute coordinates (or the reverse).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Absolute(CanvasPoint),
    Relative { parent: NodeId, offset: LocalPoint },
}

// === CanvasPoint ===

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Express this point relative to a parent whose origin is `parent_world`.
    pub fn to_local(&self, parent_world: CanvasPoint) -> LocalPoint {
        LocalPoint(self.0 - parent_world.0)
    }
}

impl From<Vec2> for CanvasPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(p: CanvasPoint) -> Self {
        p.0
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 + delta.0)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasDelta;

    /// Subtracting two points gives a delta.
    fn sub(self, other: CanvasPoint) -> Self::Output {
        CanvasDelta(self.0 - other.0)
    }
}

// === ScreenPoint ===

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for ScreenPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === LocalPoint ===

impl LocalPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Convert to canvas point given parent's world position.
    pub fn to_canvas(&self, parent_world: CanvasPoint) -> CanvasPoint {
        CanvasPoint(self.0 + parent_world.0)
    }
}

impl Add<CanvasDelta> for LocalPoint {
    type Output = LocalPoint;

    fn add(self, delta: CanvasDelta) -> Self::Output {
        LocalPoint(self.0 + delta.0)
    }
}

// === CanvasSize ===

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for CanvasSize {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === CanvasDelta ===

impl CanvasDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }
}

impl From<Vec2> for CanvasDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === Position ===

impl Position {
    pub fn absolute(x: f32, y: f32) -> Self {
        Self::Absolute(CanvasPoint::new(x, y))
    }

    pub fn relative(parent: NodeId, x: f32, y: f32) -> Self {
        Self::Relative {
            parent,
            offset: LocalPoint::new(x, y),
        }
    }

    /// The containing stage, if any.
    pub fn parent(&self) -> Option<&NodeId> {
        match self {
            Self::Absolute(_) => None,
            Self::Relative { parent, .. } => Some(parent),
        }
    }

    /// Raw coordinates in whichever frame this position is expressed in.
    pub fn raw(&self) -> Vec2 {
        match self {
            Self::Absolute(point) => point.0,
            Self::Relative { offset, .. } => offset.0,
        }
    }

    /// Both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.raw().is_finite()
    }

    /// Same frame, shifted by `delta`.
    pub fn translated(&self, delta: CanvasDelta) -> Self {
        match self {
            Self::Absolute(point) => Self::Absolute(*point + delta),
            Self::Relative { parent, offset } => Self::Relative {
                parent: parent.clone(),
                offset: *offset + delta,
            },
        }
    }

    /// Resolve to canvas space. `parent_world` is the parent's absolute origin
    /// and is ignored for absolute positions.
    pub fn to_canvas(&self, parent_world: Option<CanvasPoint>) -> CanvasPoint {
        match self {
            Self::Absolute(point) => *point,
            Self::Relative { offset, .. } => match parent_world {
                Some(origin) => offset.to_canvas(origin),
                // Orphaned child, treat as root
                None => CanvasPoint(offset.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_point_add_delta() {
        let point = CanvasPoint::new(10.0, 20.0);
        let delta = CanvasDelta::new(5.0, -3.0);
        let result = point + delta;
        assert_eq!(result.x(), 15.0);
        assert_eq!(result.y(), 17.0);
    }

    #[test]
    fn canvas_point_sub_gives_delta() {
        let p1 = CanvasPoint::new(10.0, 20.0);
        let p2 = CanvasPoint::new(3.0, 5.0);
        let delta = p1 - p2;
        assert_eq!(delta.dx(), 7.0);
        assert_eq!(delta.dy(), 15.0);
    }

    #[test]
    fn local_and_canvas_are_inverse() {
        let parent_world = CanvasPoint::new(100.0, 200.0);
        let local = LocalPoint::new(10.0, 20.0);
        let canvas = local.to_canvas(parent_world);
        assert_eq!(canvas, CanvasPoint::new(110.0, 220.0));
        assert_eq!(canvas.to_local(parent_world), local);
    }

    #[test]
    fn relative_position_resolves_against_parent() {
        let pos = Position::relative(NodeId::from("stage"), 50.0, 50.0);
        assert_eq!(pos.parent(), Some(&NodeId::from("stage")));
        let world = pos.to_canvas(Some(CanvasPoint::new(400.0, 400.0)));
        assert_eq!(world, CanvasPoint::new(450.0, 450.0));
    }

    #[test]
    fn absolute_position_ignores_parent_origin() {
        let pos = Position::absolute(5.0, 6.0);
        assert!(pos.parent().is_none());
        assert_eq!(
            pos.to_canvas(Some(CanvasPoint::new(100.0, 100.0))),
            CanvasPoint::new(5.0, 6.0)
        );
    }

    #[test]
    fn translated_keeps_frame() {
        let pos = Position::relative(NodeId::from("s"), 1.0, 2.0);
        let moved = pos.translated(CanvasDelta::new(10.0, 10.0));
        assert_eq!(moved, Position::relative(NodeId::from("s"), 11.0, 12.0));
    }

    #[test]
    fn position_finiteness() {
        assert!(Position::absolute(1e30, -4.0).is_finite());
        assert!(!Position::absolute(f32::INFINITY, 0.0).is_finite());
        assert!(!Position::relative(NodeId::from("s"), 0.0, f32::NAN).is_finite());
    }
}
