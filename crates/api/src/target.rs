//! Target specification for commands.
//!
//! Commands that act on nodes name them either directly by id or through a
//! query over the current graph.

use node::{NodeId, NodeKindTag};
use serde::{Deserialize, Serialize};

/// Specifies which nodes a command targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Specific node by ID.
    Node(NodeId),

    /// Multiple specific nodes by ID.
    Nodes(Vec<NodeId>),

    /// All nodes on the canvas.
    All,

    /// Nodes matching a query.
    Query(NodeQuery),
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl From<Vec<NodeId>> for Target {
    fn from(ids: Vec<NodeId>) -> Self {
        Self::Nodes(ids)
    }
}

/// Query to find nodes by properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeQuery {
    /// Nodes of a specific kind.
    ByKind(NodeKindTag),

    /// Nodes whose label matches exactly.
    ByLabel(String),

    /// Nodes whose canvas box intersects a rectangle.
    InBounds {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },

    /// Task cards owned by the targeted stages.
    ChildrenOf(Box<Target>),

    /// Stages owning the targeted task cards.
    ParentOf(Box<Target>),
}
