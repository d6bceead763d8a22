//! Read-only view of the builder for the presentation layer.
//!
//! The snapshot carries plain data plus [`NodeIntent`] values the host binds
//! its delete/edit controls to. Nothing in here calls back into the builder.

use crate::{EditField, EditSession, Viewport};
use graph::GraphStore;
use node::{Bounds, CanvasPoint, Edge, Node, NodeId, NodeKind, Position};
use serde::Serialize;
use std::collections::HashMap;

/// An action the host can send back for a node.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeIntent {
    Delete { node_id: NodeId },
    Edit { node_id: NodeId, field: EditField },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeHandles {
    pub delete: NodeIntent,
    pub edit: NodeIntent,
}

/// Per-kind presentation data.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum NodeView {
    Stage { display_number: u32 },
    TaskCard { department: String },
    Conditional { outputs: Vec<&'static str> },
    ErrorHandler { description: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub view: NodeView,
    pub title: String,
    /// Canvas-space box, with any drag preview applied.
    pub bounds: Bounds,
    pub parent_id: Option<NodeId>,
    pub dragging: bool,
    pub editing: bool,
    pub handles: NodeHandles,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
    pub edit_session: Option<EditSession>,
}

impl RenderSnapshot {
    pub fn node(&self, id: &NodeId) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

fn view_of(node: &Node) -> (NodeView, String) {
    match &node.kind {
        NodeKind::Stage { display_number } => (
            NodeView::Stage {
                display_number: *display_number,
            },
            format!("{}. {}", display_number, node.label),
        ),
        NodeKind::TaskCard { department } => (
            NodeView::TaskCard {
                department: department.clone(),
            },
            node.label.clone(),
        ),
        NodeKind::Conditional => (
            NodeView::Conditional {
                outputs: node.kind.source_handles().to_vec(),
            },
            node.label.clone(),
        ),
        NodeKind::ErrorHandler { description } => (
            NodeView::ErrorHandler {
                description: description.clone(),
            },
            node.label.clone(),
        ),
    }
}

pub fn render(
    store: &GraphStore,
    viewport: &Viewport,
    preview: Option<(&NodeId, &Position)>,
    edit_session: Option<&EditSession>,
) -> RenderSnapshot {
    // Canvas origins with the preview applied, so children of a dragged
    // stage follow it.
    let mut origins: HashMap<&NodeId, CanvasPoint> = HashMap::new();
    for node in store.stages() {
        if let Some(origin) = store.absolute_position(&node.id) {
            origins.insert(&node.id, origin);
        }
    }
    if let Some((id, position)) = preview {
        let parent_world = position.parent().and_then(|p| origins.get(p).copied());
        if let Some(node) = store.node(id) {
            origins.insert(&node.id, position.to_canvas(parent_world));
        }
    }

    let nodes = store
        .nodes()
        .map(|node| {
            let dragging = preview.is_some_and(|(id, _)| id == &node.id);
            let origin = match origins.get(&node.id) {
                Some(origin) => *origin,
                None => {
                    let parent_world = node.parent_id().and_then(|p| origins.get(p).copied());
                    node.position.to_canvas(parent_world)
                }
            };
            let (view, title) = view_of(node);
            RenderNode {
                id: node.id.clone(),
                view,
                title,
                bounds: Bounds::from_origin_size(origin, node.size),
                parent_id: node.parent_id().cloned(),
                dragging,
                editing: edit_session.is_some_and(|s| s.node_id == node.id),
                handles: NodeHandles {
                    delete: NodeIntent::Delete {
                        node_id: node.id.clone(),
                    },
                    edit: NodeIntent::Edit {
                        node_id: node.id.clone(),
                        field: EditField::Label,
                    },
                },
            }
        })
        .collect();

    RenderSnapshot {
        nodes,
        edges: store.edges().cloned().collect(),
        viewport: viewport.clone(),
        edit_session: edit_session.cloned(),
    }
}
