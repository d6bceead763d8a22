use crate::{PersistError, FORMAT_VERSION};
use graph::{GraphSnapshot, GraphStore};
use node::{
    CanvasPoint, CanvasSize, Edge, EdgeId, EdgeStyle, LocalPoint, Node, NodeId, NodeKind,
    NodeKindTag, Position,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The persisted `{version, nodes, edges}` document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Versionless documents predate versioning and read as version 1.
    #[serde(default = "legacy_version")]
    pub version: u32,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

fn legacy_version() -> u32 {
    1
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeRecord {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    pub id: String,
    pub kind: NodeKindTag,
    pub position: PointRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_number: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
}

impl Document {
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> Self {
        Self {
            version: FORMAT_VERSION,
            nodes: snapshot.nodes.iter().map(NodeRecord::from_node).collect(),
            edges: snapshot.edges.iter().map(EdgeRecord::from_edge).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Rebuild a graph store, rejecting anything that breaks the graph invariants.
    ///
    /// `intrinsic` supplies the size for non-stage nodes saved without one.
    pub fn into_store(
        self,
        intrinsic: &dyn Fn(NodeKindTag) -> CanvasSize,
    ) -> Result<GraphStore, PersistError> {
        if self.version != FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion(self.version));
        }

        let kinds: HashMap<&str, NodeKindTag> =
            self.nodes.iter().map(|n| (n.id.as_str(), n.kind)).collect();
        if kinds.len() != self.nodes.len() {
            return Err(invalid("duplicate node id"));
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for record in &self.nodes {
            nodes.push(record.to_node(&kinds, intrinsic)?);
        }

        let mut edge_ids = HashSet::new();
        let mut edges = Vec::with_capacity(self.edges.len());
        for record in &self.edges {
            if !edge_ids.insert(record.id.as_str()) {
                return Err(invalid(format!("duplicate edge id '{}'", record.id)));
            }
            if !kinds.contains_key(record.source_node_id.as_str())
                || !kinds.contains_key(record.target_node_id.as_str())
            {
                return Err(invalid(format!("edge '{}' has a missing endpoint", record.id)));
            }
            edges.push(record.to_edge());
        }

        let (node_count, edge_count) = (nodes.len(), edges.len());
        let store = GraphStore::from_parts(nodes, edges);
        if store.node_count() != node_count || store.edge_count() != edge_count {
            return Err(invalid("document contains connections the graph does not accept"));
        }
        Ok(store)
    }
}

fn invalid(message: impl Into<String>) -> PersistError {
    PersistError::InvalidDocument(message.into())
}

impl NodeRecord {
    pub fn from_node(node: &Node) -> Self {
        let raw = node.position.raw();
        let mut record = Self {
            id: node.id.to_string(),
            kind: node.tag(),
            position: PointRecord { x: raw.x, y: raw.y },
            size: Some(SizeRecord {
                width: node.size.width(),
                height: node.size.height(),
            }),
            parent_id: node.parent_id().map(|p| p.to_string()),
            label: node.label.clone(),
            department: None,
            description: None,
            display_number: None,
        };
        match &node.kind {
            NodeKind::Stage { display_number } => record.display_number = Some(*display_number),
            NodeKind::TaskCard { department } => record.department = Some(department.clone()),
            NodeKind::ErrorHandler { description } => {
                record.description = Some(description.clone())
            }
            NodeKind::Conditional => {}
        }
        record
    }

    fn to_node(
        &self,
        kinds: &HashMap<&str, NodeKindTag>,
        intrinsic: &dyn Fn(NodeKindTag) -> CanvasSize,
    ) -> Result<Node, PersistError> {
        let PointRecord { x, y } = self.position;
        if !x.is_finite() || !y.is_finite() {
            return Err(invalid(format!("node '{}' has a non-finite position", self.id)));
        }

        let size = match (self.size, self.kind) {
            (Some(SizeRecord { width, height }), _) => {
                if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
                    return Err(invalid(format!("node '{}' has an invalid size", self.id)));
                }
                CanvasSize::new(width, height)
            }
            (None, NodeKindTag::Stage) => {
                return Err(invalid(format!("stage '{}' has no size", self.id)));
            }
            (None, kind) => intrinsic(kind),
        };

        let position = match &self.parent_id {
            None => Position::Absolute(CanvasPoint::new(x, y)),
            Some(parent) => {
                if self.kind != NodeKindTag::TaskCard {
                    return Err(invalid(format!(
                        "only task cards can be parented, '{}' is a {}",
                        self.id, self.kind
                    )));
                }
                if kinds.get(parent.as_str()) != Some(&NodeKindTag::Stage) {
                    return Err(invalid(format!(
                        "parent '{}' of '{}' is not a stage",
                        parent, self.id
                    )));
                }
                Position::Relative {
                    parent: NodeId::from(parent.as_str()),
                    offset: LocalPoint::new(x, y),
                }
            }
        };

        let kind = match self.kind {
            NodeKindTag::Stage => NodeKind::Stage {
                display_number: self.display_number.unwrap_or_default(),
            },
            NodeKindTag::TaskCard => {
                NodeKind::task_card(self.department.clone().unwrap_or_default())
            }
            NodeKindTag::Conditional => NodeKind::Conditional,
            NodeKindTag::ErrorHandler => {
                NodeKind::error_handler(self.description.clone().unwrap_or_default())
            }
        };

        Ok(Node {
            id: NodeId::from(self.id.as_str()),
            kind,
            position,
            size,
            label: self.label.clone(),
        })
    }
}

impl EdgeRecord {
    pub fn from_edge(edge: &Edge) -> Self {
        Self {
            id: edge.id.to_string(),
            source_node_id: edge.source.to_string(),
            target_node_id: edge.target.to_string(),
            source_handle: edge.source_handle.clone(),
            target_handle: edge.target_handle.clone(),
            style: edge.style.clone(),
        }
    }

    fn to_edge(&self) -> Edge {
        Edge {
            id: EdgeId::from(self.id.as_str()),
            source: NodeId::from(self.source_node_id.as_str()),
            target: NodeId::from(self.target_node_id.as_str()),
            source_handle: self.source_handle.clone(),
            target_handle: self.target_handle.clone(),
            style: self.style.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{NodeSpec, TaskPoolEntry, CONDITIONAL_TRUE};

    fn intrinsic(kind: NodeKindTag) -> CanvasSize {
        match kind {
            NodeKindTag::Stage => CanvasSize::new(220.0, 140.0),
            _ => CanvasSize::new(150.0, 60.0),
        }
    }

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        let stage = store
            .add_node(
                NodeSpec::stage(CanvasPoint::new(100.0, 100.0), CanvasSize::new(220.0, 140.0))
                    .with_label("Intake"),
            )
            .unwrap();
        let card = store
            .insert_node_with_id(
                NodeId::from("t1"),
                TaskPoolEntry::new("t1", "Verify invoice", "Finance").to_spec(
                    Position::relative(stage.clone(), 50.0, 50.0),
                    CanvasSize::new(150.0, 60.0),
                ),
            )
            .unwrap();
        let cond = store
            .add_node(
                NodeSpec::conditional(CanvasPoint::new(400.0, 120.0), CanvasSize::new(140.0, 80.0))
                    .with_label("Approved?"),
            )
            .unwrap();
        let err = store
            .add_node(
                NodeSpec::error_handler(
                    CanvasPoint::new(400.0, 300.0),
                    CanvasSize::new(180.0, 70.0),
                )
                .with_label("Escalate"),
            )
            .unwrap();
        store.update_description(&err, "Page the on-call lead");
        store.add_edge(&card, &cond, None, None).unwrap();
        let edge = store.add_edge(&cond, &err, Some(CONDITIONAL_TRUE.into()), None).unwrap();
        store.update_edge_style(
            &edge,
            Some(EdgeStyle {
                stroke: Some("#e11d48".into()),
                stroke_width: Some(2.0),
                animated: true,
            }),
        );
        store
    }

    #[test]
    fn test_round_trip_preserves_graph() {
        let store = sample_store();
        let json = Document::from_snapshot(&store.snapshot()).to_json().unwrap();
        let restored = Document::from_json(&json).unwrap().into_store(&intrinsic).unwrap();
        assert_eq!(restored.snapshot(), store.snapshot());
    }

    #[test]
    fn test_wire_shape_matches_schema() {
        let doc = Document::from_snapshot(&sample_store().snapshot());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["version"], 1);
        let card = &json["nodes"][1];
        assert_eq!(card["kind"], "taskCard");
        assert_eq!(card["position"], serde_json::json!({"x": 50.0, "y": 50.0}));
        assert_eq!(card["department"], "Finance");
        assert!(card["parentId"].is_string());
        assert!(card.get("displayNumber").is_none());

        assert_eq!(json["nodes"][0]["displayNumber"], 1);
        assert_eq!(json["edges"][1]["sourceHandle"], "true");
        assert_eq!(json["edges"][1]["style"]["strokeWidth"], 2.0);
        assert!(json["edges"][0].get("targetHandle").is_none());
    }

    #[test]
    fn test_versionless_document_reads_as_v1() {
        let input = r#"{
            "nodes": [
                { "id": "s", "kind": "stage", "position": {"x": 0, "y": 0},
                  "size": {"width": 220, "height": 140}, "label": "Only", "displayNumber": 7 },
                { "id": "c", "kind": "conditional", "position": {"x": 400, "y": 0}, "label": "?" }
            ],
            "edges": []
        }"#;
        let store = Document::from_json(input).unwrap().into_store(&intrinsic).unwrap();
        let stage = store.node(&NodeId::from("s")).unwrap();
        assert_eq!(stage.display_number(), Some(1));
        assert_eq!(store.node(&NodeId::from("c")).unwrap().size, CanvasSize::new(150.0, 60.0));
    }

    #[test]
    fn test_schema_mismatches_are_rejected() {
        let cases = [
            // Future version
            r#"{"version": 2, "nodes": [], "edges": []}"#,
            // Stage without size
            r#"{"nodes": [{"id": "s", "kind": "stage", "position": {"x": 0, "y": 0}, "label": ""}], "edges": []}"#,
            // Parent is not a stage
            r#"{"nodes": [
                {"id": "a", "kind": "taskCard", "position": {"x": 0, "y": 0}, "label": ""},
                {"id": "b", "kind": "taskCard", "position": {"x": 0, "y": 0}, "parentId": "a", "label": ""}
            ], "edges": []}"#,
            // Dangling edge
            r#"{"nodes": [{"id": "a", "kind": "taskCard", "position": {"x": 0, "y": 0}, "label": ""}],
                "edges": [{"id": "e", "sourceNodeId": "a", "targetNodeId": "zzz"}]}"#,
            // Duplicate node id
            r#"{"nodes": [
                {"id": "a", "kind": "taskCard", "position": {"x": 0, "y": 0}, "label": ""},
                {"id": "a", "kind": "taskCard", "position": {"x": 9, "y": 9}, "label": ""}
            ], "edges": []}"#,
            // Handle a task card does not expose
            r#"{"nodes": [
                {"id": "a", "kind": "taskCard", "position": {"x": 0, "y": 0}, "label": ""},
                {"id": "b", "kind": "taskCard", "position": {"x": 300, "y": 0}, "label": ""}
            ], "edges": [{"id": "e", "sourceNodeId": "a", "targetNodeId": "b", "sourceHandle": "true"}]}"#,
        ];
        for input in cases {
            let result = Document::from_json(input).and_then(|doc| doc.into_store(&intrinsic));
            assert!(result.is_err(), "accepted: {input}");
        }
    }

    #[test]
    fn test_unknown_kind_fails_to_parse() {
        let input = r#"{"nodes": [{"id": "a", "kind": "widget", "position": {"x": 0, "y": 0}, "label": ""}], "edges": []}"#;
        assert!(matches!(Document::from_json(input), Err(PersistError::Json(_))));
    }
}
