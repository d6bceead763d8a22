//! The graph store: an id-indexed arena of nodes and edges.
//!
//! Every mutation is synchronous and total. Operations naming an id that is
//! no longer present are no-ops, so stale UI handlers that fire after a node
//! has gone away cannot corrupt the graph. Each mutation reports whether it
//! did anything and queues [`GraphEvent`]s for the owner to drain.

use crate::cascade;
use crate::GraphEvent;
use node::{
    Bounds, CanvasPoint, CanvasSize, Edge, EdgeId, EdgeStyle, HandleId, Node, NodeId, NodeKind,
    NodeSpec, Position,
};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};

slotmap::new_key_type! {
    struct NodeKey;
    struct EdgeKey;
}

/// Immutable copy of the graph, in node-list and edge-list order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

/// Everything a removal took out of the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Removal {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Removal {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }
}

/// Authoritative owner of the workflow graph.
#[derive(Default)]
pub struct GraphStore {
    nodes: SlotMap<NodeKey, Node>,
    node_index: HashMap<NodeId, NodeKey>,
    /// Insertion order; stage display numbers and resolver tie-breaks follow it.
    node_order: Vec<NodeKey>,

    edges: SlotMap<EdgeKey, Edge>,
    edge_index: HashMap<EdgeId, EdgeKey>,
    edge_order: Vec<EdgeKey>,

    events: Vec<GraphEvent>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously saved parts.
    ///
    /// Ids are kept. Duplicate ids, parents that are not stages and edges
    /// that would not be accepted by [`GraphStore::add_edge`] are dropped or
    /// repaired so the result always satisfies the graph invariants. Display
    /// numbers are recomputed from node order. No events are queued.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let mut store = Self::new();

        for node in nodes {
            if store.node_index.contains_key(&node.id) {
                log::warn!("Dropping duplicate node {}", node.id);
                continue;
            }
            store.insert_raw(node);
        }

        let keys: Vec<NodeKey> = store.node_order.clone();
        for key in keys {
            let Some(node) = store.nodes.get(key) else {
                continue;
            };
            let repaired = store.sanitize_position(node);
            if repaired != node.position {
                if let Some(node) = store.nodes.get_mut(key) {
                    node.position = repaired;
                }
            }
        }

        for edge in edges {
            if store.edge_index.contains_key(&edge.id) || !store.connection_allowed(&edge) {
                log::warn!("Dropping invalid edge {}", edge.id);
                continue;
            }
            store.insert_edge_raw(edge);
        }

        cascade::renumber_stages(&mut store);
        store.events.clear();
        store
    }

    // === Node creation ===

    /// Insert a node under a fresh id. No-op if the spec's position or size
    /// is not finite.
    pub fn add_node(&mut self, spec: NodeSpec) -> Option<NodeId> {
        let id = NodeId::new();
        self.insert(Node::from_spec(id.clone(), spec)).then_some(id)
    }

    /// Insert a node under a caller-chosen id. No-op if the id is taken or
    /// the geometry is not finite.
    pub fn insert_node_with_id(&mut self, id: NodeId, spec: NodeSpec) -> Option<NodeId> {
        if self.node_index.contains_key(&id) {
            return None;
        }
        self.insert(Node::from_spec(id.clone(), spec)).then_some(id)
    }

    fn insert(&mut self, mut node: Node) -> bool {
        if !node.position.is_finite() || !valid_size(node.size) {
            log::warn!("Rejected {} node {} with non-finite geometry", node.tag(), node.id);
            return false;
        }
        node.position = self.sanitize_position(&node);
        if let NodeKind::Stage { display_number } = &mut node.kind {
            *display_number = self.stage_count() as u32 + 1;
        }
        log::debug!("Added {} node {}", node.tag(), node.id);
        self.events.push(GraphEvent::NodeAdded(node.id.clone()));
        self.insert_raw(node);
        true
    }

    fn insert_raw(&mut self, node: Node) {
        let id = node.id.clone();
        let key = self.nodes.insert(node);
        self.node_index.insert(id, key);
        self.node_order.push(key);
    }

    /// A relative position is only kept when it names an existing stage and
    /// the node is a task card; anything else is resolved to canvas space.
    fn sanitize_position(&self, node: &Node) -> Position {
        let Position::Relative { parent, .. } = &node.position else {
            return node.position.clone();
        };
        let parent_is_stage = self.node(parent).is_some_and(Node::is_stage);
        if node.is_task_card() && parent_is_stage && parent != &node.id {
            return node.position.clone();
        }
        log::warn!("Node {} cannot be parented to {}, placing it on the canvas", node.id, parent);
        Position::Absolute(node.position.to_canvas(self.parent_origin(node)))
    }

    // === Removal ===

    /// Remove a node and every edge touching it.
    ///
    /// Stages take their task cards with them, see [`cascade::delete_stage`].
    pub fn remove_node(&mut self, id: &NodeId) -> Removal {
        match self.node(id) {
            None => Removal::default(),
            Some(node) if node.is_stage() => cascade::delete_stage(self, id),
            Some(_) => self.detach(std::slice::from_ref(id)),
        }
    }

    /// Remove the given nodes and every edge touching any of them.
    pub(crate) fn detach(&mut self, ids: &[NodeId]) -> Removal {
        let doomed: HashSet<&NodeId> = ids.iter().collect();

        let edge_ids: Vec<EdgeId> = self
            .edges()
            .filter(|e| doomed.contains(&e.source) || doomed.contains(&e.target))
            .map(|e| e.id.clone())
            .collect();
        let edges: Vec<Edge> = edge_ids.iter().filter_map(|id| self.remove_edge(id)).collect();

        let mut nodes = Vec::new();
        for id in ids {
            let Some(key) = self.node_index.remove(id) else {
                continue;
            };
            self.node_order.retain(|k| *k != key);
            if let Some(node) = self.nodes.remove(key) {
                log::debug!("Removed {} node {}", node.tag(), node.id);
                self.events.push(GraphEvent::NodeRemoved(node.id.clone()));
                nodes.push(node);
            }
        }

        Removal { nodes, edges }
    }

    // === Edges ===

    /// Connect two nodes. Returns `None` when either end is missing, the
    /// handles are not exposed by the nodes, the edge would be a self-loop,
    /// or the exact same connection already exists.
    pub fn add_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        source_handle: Option<HandleId>,
        target_handle: Option<HandleId>,
    ) -> Option<EdgeId> {
        let edge = Edge {
            id: EdgeId::new(),
            source: source.clone(),
            target: target.clone(),
            source_handle,
            target_handle,
            style: None,
        };
        if !self.connection_allowed(&edge) {
            log::debug!("Rejected edge {} -> {}", source, target);
            return None;
        }
        let id = edge.id.clone();
        log::debug!("Added edge {} ({} -> {})", id, edge.source, edge.target);
        self.events.push(GraphEvent::EdgeAdded(id.clone()));
        self.insert_edge_raw(edge);
        Some(id)
    }

    fn connection_allowed(&self, edge: &Edge) -> bool {
        if edge.source == edge.target {
            return false;
        }
        let (Some(source), Some(target)) = (self.node(&edge.source), self.node(&edge.target)) else {
            return false;
        };
        source.kind.accepts_source_handle(edge.source_handle.as_deref())
            && target.kind.accepts_target_handle(edge.target_handle.as_deref())
            && !self.edges().any(|existing| existing.same_connection(edge))
    }

    fn insert_edge_raw(&mut self, edge: Edge) {
        let id = edge.id.clone();
        let key = self.edges.insert(edge);
        self.edge_index.insert(id, key);
        self.edge_order.push(key);
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let key = self.edge_index.remove(id)?;
        self.edge_order.retain(|k| *k != key);
        let edge = self.edges.remove(key)?;
        log::debug!("Removed edge {}", edge.id);
        self.events.push(GraphEvent::EdgeRemoved(edge.id.clone()));
        Some(edge)
    }

    pub fn update_edge_style(&mut self, id: &EdgeId, style: Option<EdgeStyle>) -> bool {
        let Some(edge) = self.edge_index.get(id).and_then(|key| self.edges.get_mut(*key)) else {
            return false;
        };
        if edge.style == style {
            return false;
        }
        edge.style = style;
        self.events.push(GraphEvent::EdgeChanged(id.clone()));
        true
    }

    // === Node updates ===

    /// Move a node within its current coordinate frame.
    ///
    /// Changing frames goes through [`GraphStore::reparent`]; a position
    /// naming a different parent than the node has is rejected.
    pub fn update_node_position(&mut self, id: &NodeId, to: Position) -> bool {
        if !to.is_finite() {
            return false;
        }
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.position.parent() != to.parent() || node.position == to {
            return false;
        }
        node.position = to;
        self.events.push(GraphEvent::NodeChanged(id.clone()));
        true
    }

    /// Set parent and position together.
    ///
    /// `to` carries both: [`Position::Relative`] names the new stage,
    /// [`Position::Absolute`] clears the parent. Only task cards may be
    /// parented, and only to an existing stage.
    pub fn reparent(&mut self, id: &NodeId, to: Position) -> bool {
        if !to.is_finite() {
            return false;
        }
        let Some(node) = self.node(id) else {
            return false;
        };
        if let Some(parent) = to.parent() {
            let parent_is_stage = self.node(parent).is_some_and(Node::is_stage);
            if !node.is_task_card() || !parent_is_stage || parent == id {
                log::debug!("Rejected reparent of {} under {}", id, parent);
                return false;
            }
        }

        let from = node.parent_id().cloned();
        let new_parent = to.parent().cloned();
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.position = to;

        if from == new_parent {
            self.events.push(GraphEvent::NodeChanged(id.clone()));
        } else {
            log::debug!("Reparented {} from {:?} to {:?}", id, from, new_parent);
            self.events.push(GraphEvent::Reparented {
                id: id.clone(),
                from,
                to: new_parent,
            });
        }
        true
    }

    pub fn update_node_label(&mut self, id: &NodeId, label: impl Into<String>) -> bool {
        let label = label.into();
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if node.label == label {
            return false;
        }
        node.label = label;
        self.events.push(GraphEvent::NodeChanged(id.clone()));
        true
    }

    /// Only meaningful for task cards.
    pub fn update_department(&mut self, id: &NodeId, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(NodeKind::TaskCard { department }) = self.node_mut(id).map(|n| &mut n.kind) else {
            return false;
        };
        if *department == value {
            return false;
        }
        *department = value;
        self.events.push(GraphEvent::NodeChanged(id.clone()));
        true
    }

    /// Only meaningful for error handlers.
    pub fn update_description(&mut self, id: &NodeId, value: impl Into<String>) -> bool {
        let value = value.into();
        let Some(NodeKind::ErrorHandler { description }) = self.node_mut(id).map(|n| &mut n.kind)
        else {
            return false;
        };
        if *description == value {
            return false;
        }
        *description = value;
        self.events.push(GraphEvent::NodeChanged(id.clone()));
        true
    }

    /// Sizes must be finite and positive.
    pub fn update_node_size(&mut self, id: &NodeId, size: CanvasSize) -> bool {
        let valid = valid_size(size);
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if !valid || node.size == size {
            return false;
        }
        node.size = size;
        self.events.push(GraphEvent::NodeChanged(id.clone()));
        true
    }

    pub(crate) fn set_display_number(&mut self, id: &NodeId, number: u32) -> bool {
        let Some(NodeKind::Stage { display_number }) = self.node_mut(id).map(|n| &mut n.kind) else {
            return false;
        };
        if *display_number == number {
            return false;
        }
        *display_number = number;
        true
    }

    pub(crate) fn push_event(&mut self, event: GraphEvent) {
        self.events.push(event);
    }

    // === Queries ===

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index.get(id).and_then(|key| self.nodes.get(*key))
    }

    fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        let key = self.node_index.get(id)?;
        self.nodes.get_mut(*key)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edge_index.get(id).and_then(|key| self.edges.get(*key))
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    /// Nodes in node-list order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_order.iter().filter_map(|key| self.nodes.get(*key))
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edge_order.iter().filter_map(|key| self.edges.get(*key))
    }

    pub fn stages(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes().filter(|n| n.is_stage())
    }

    pub fn stage_count(&self) -> usize {
        self.stages().count()
    }

    /// Task cards owned by `stage`, in node-list order.
    pub fn children_of<'a>(&'a self, stage: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes().filter(move |n| n.parent_id() == Some(stage))
    }

    pub fn edges_of<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges().filter(move |e| e.touches(id))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Canvas-space origin of the node's parent, if it has one that exists.
    ///
    /// Parents are always stages and stages are never parented, so a single
    /// hop is enough.
    pub fn parent_origin(&self, node: &Node) -> Option<CanvasPoint> {
        let parent = self.node(node.parent_id()?)?;
        Some(parent.position.to_canvas(None))
    }

    /// Top-left corner of the node in canvas space.
    pub fn absolute_position(&self, id: &NodeId) -> Option<CanvasPoint> {
        let node = self.node(id)?;
        Some(node.position.to_canvas(self.parent_origin(node)))
    }

    /// The node's box in canvas space.
    pub fn absolute_bounds(&self, id: &NodeId) -> Option<Bounds> {
        let node = self.node(id)?;
        let origin = node.position.to_canvas(self.parent_origin(node));
        Some(Bounds::from_origin_size(origin, node.size))
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
        }
    }

    /// Drain queued change notifications.
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }
}

fn valid_size(size: CanvasSize) -> bool {
    size.0.is_finite() && size.width() > 0.0 && size.height() > 0.0
}
