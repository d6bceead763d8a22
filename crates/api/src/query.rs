//! Waypoint queries - read-only access to builder state.
//!
//! Queries allow inspecting the workflow without modifying it. Useful for
//! scripts to find ids before issuing commands.

use crate::Target;
use builder::{EditSession, RenderSnapshot, Viewport};
use glam::Vec2;
use node::{Edge, NodeId, NodeKindTag, TaskPoolEntry};
use serde::{Deserialize, Serialize};

/// A query for builder state (read-only).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Everything the presentation layer would draw.
    GetSnapshot,

    /// Get a specific node by ID.
    GetNode { id: NodeId },

    /// Get nodes matching a target.
    GetNodes { target: Target },

    /// Get all edges.
    GetEdges,

    /// Get the tasks still waiting to be placed.
    GetPool,

    /// Get the open edit session, if any.
    GetEditSession,

    /// Get the current viewport state.
    GetViewport,

    /// Get node count.
    GetNodeCount,
}

/// Response to a query.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Snapshot { snapshot: RenderSnapshot },

    Node { node: Option<NodeInfo> },

    Nodes { nodes: Vec<NodeInfo> },

    Edges { edges: Vec<Edge> },

    Pool { entries: Vec<TaskPoolEntry> },

    EditSession { session: Option<EditSession> },

    Viewport { viewport: Viewport },

    Count { count: usize },
}

/// Serializable node information, with the position resolved to canvas space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub kind: NodeKindTag,
    pub label: String,
    /// Top-left corner in canvas space.
    pub position: Vec2,
    pub size: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Offset from the parent's origin, for parented nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_position: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_wire_format() {
        let query: Query = serde_json::from_str(r#"{"type": "get_node", "id": "s1"}"#).unwrap();
        assert!(matches!(query, Query::GetNode { id } if id == NodeId::from("s1")));

        let json = serde_json::to_value(Query::GetNodeCount).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "get_node_count" }));
    }

    #[test]
    fn count_result_serializes_flat() {
        let json = serde_json::to_value(QueryResult::Count { count: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "count", "count": 3 }));
    }
}
