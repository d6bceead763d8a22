//! Node types for the Waypoint workflow builder.
//!
//! This crate holds the plain data model shared by every other crate:
//! typed coordinate spaces, bounding boxes, and the node/edge/pool-entry
//! records the graph store owns. Nothing here knows about mutation policy.

pub mod bounds;
pub mod coords;
mod id;
mod node;

pub use bounds::Bounds;
pub use coords::{CanvasDelta, CanvasPoint, CanvasSize, LocalPoint, Position, ScreenPoint};
pub use id::{EdgeId, NodeId};
pub use node::{
    Edge, EdgeStyle, HandleId, Node, NodeKind, NodeKindTag, NodeSpec, TaskPoolEntry,
    CONDITIONAL_FALSE, CONDITIONAL_TRUE,
};
