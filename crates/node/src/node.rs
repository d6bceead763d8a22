use crate::coords::{CanvasPoint, CanvasSize, Position};
use crate::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Source handle for the "condition holds" output of a conditional.
pub const CONDITIONAL_TRUE: &str = "true";
/// Source handle for the "condition fails" output of a conditional.
pub const CONDITIONAL_FALSE: &str = "false";

/// Named connection point on a node.
pub type HandleId = String;

/// The kind of a node, with the data only that kind carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeKind {
    /// A container for task cards. `display_number` is assigned by the
    /// graph store and always forms a contiguous 1..N sequence.
    Stage { display_number: u32 },
    TaskCard { department: String },
    /// A branch with two outputs, see [`CONDITIONAL_TRUE`] and [`CONDITIONAL_FALSE`].
    Conditional,
    /// Terminal annotation describing how failures are handled.
    ErrorHandler { description: String },
}

/// Field-less discriminant of [`NodeKind`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum NodeKindTag {
    Stage,
    TaskCard,
    Conditional,
    ErrorHandler,
}

impl NodeKind {
    pub fn stage() -> Self {
        Self::Stage { display_number: 0 }
    }

    pub fn task_card(department: impl Into<String>) -> Self {
        Self::TaskCard {
            department: department.into(),
        }
    }

    pub fn error_handler(description: impl Into<String>) -> Self {
        Self::ErrorHandler {
            description: description.into(),
        }
    }

    pub fn tag(&self) -> NodeKindTag {
        match self {
            Self::Stage { .. } => NodeKindTag::Stage,
            Self::TaskCard { .. } => NodeKindTag::TaskCard,
            Self::Conditional => NodeKindTag::Conditional,
            Self::ErrorHandler { .. } => NodeKindTag::ErrorHandler,
        }
    }

    /// Named outputs this kind exposes. An empty list means a single
    /// anonymous output (or none, for terminal kinds).
    pub fn source_handles(&self) -> SmallVec<[&'static str; 2]> {
        match self {
            Self::Conditional => smallvec![CONDITIONAL_TRUE, CONDITIONAL_FALSE],
            _ => SmallVec::new(),
        }
    }

    /// Whether an edge may leave this node through `handle`.
    pub fn accepts_source_handle(&self, handle: Option<&str>) -> bool {
        match (self, handle) {
            (Self::ErrorHandler { .. }, _) => false,
            (Self::Conditional, Some(handle)) => {
                self.source_handles().iter().any(|known| *known == handle)
            }
            (Self::Conditional, None) => false,
            (_, handle) => handle.is_none(),
        }
    }

    /// Every kind has exactly one anonymous input.
    pub fn accepts_target_handle(&self, handle: Option<&str>) -> bool {
        handle.is_none()
    }
}

/// A vertex on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub position: Position,
    /// Explicit container size for stages; measured (or intrinsic) size otherwise.
    pub size: CanvasSize,
    pub label: String,
}

impl Node {
    pub fn from_spec(id: NodeId, spec: NodeSpec) -> Self {
        Self {
            id,
            kind: spec.kind,
            position: spec.position,
            size: spec.size,
            label: spec.label,
        }
    }

    pub fn tag(&self) -> NodeKindTag {
        self.kind.tag()
    }

    pub fn is_stage(&self) -> bool {
        matches!(self.kind, NodeKind::Stage { .. })
    }

    pub fn is_task_card(&self) -> bool {
        matches!(self.kind, NodeKind::TaskCard { .. })
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.position.parent()
    }

    pub fn display_number(&self) -> Option<u32> {
        match self.kind {
            NodeKind::Stage { display_number } => Some(display_number),
            _ => None,
        }
    }

    pub fn department(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::TaskCard { department } => Some(department),
            _ => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::ErrorHandler { description } => Some(description),
            _ => None,
        }
    }
}

/// Everything needed to create a node except its id.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub position: Position,
    pub size: CanvasSize,
    pub label: String,
}

impl NodeSpec {
    pub fn new(kind: NodeKind, at: CanvasPoint, size: CanvasSize) -> Self {
        Self {
            kind,
            position: Position::Absolute(at),
            size,
            label: String::new(),
        }
    }

    pub fn stage(at: CanvasPoint, size: CanvasSize) -> Self {
        Self::new(NodeKind::stage(), at, size)
    }

    pub fn conditional(at: CanvasPoint, size: CanvasSize) -> Self {
        Self::new(NodeKind::Conditional, at, size)
    }

    pub fn error_handler(at: CanvasPoint, size: CanvasSize) -> Self {
        Self::new(NodeKind::error_handler(""), at, size)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// Visual override for a single edge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(default)]
    pub animated: bool,
}

/// A directed connection between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    #[serde(rename = "sourceNodeId")]
    pub source: NodeId,
    #[serde(rename = "targetNodeId")]
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<HandleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<HandleId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
}

impl Edge {
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }

    /// Same endpoints through the same handles.
    pub fn same_connection(&self, other: &Edge) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.source_handle == other.source_handle
            && self.target_handle == other.target_handle
    }
}

/// A task waiting in the pool to be dragged onto the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPoolEntry {
    pub id: NodeId,
    pub label: String,
    pub department: String,
}

impl TaskPoolEntry {
    pub fn new(
        id: impl Into<NodeId>,
        label: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            department: department.into(),
        }
    }

    /// The task card this entry becomes when placed at `position`.
    pub fn to_spec(&self, position: Position, size: CanvasSize) -> NodeSpec {
        NodeSpec {
            kind: NodeKind::task_card(self.department.clone()),
            position,
            size,
            label: self.label.clone(),
        }
    }

    /// The pool entry a removed task card returns as.
    pub fn from_node(node: &Node) -> Option<Self> {
        let department = node.department()?;
        Some(Self {
            id: node.id.clone(),
            label: node.label.clone(),
            department: department.to_string(),
        })
    }
}
