use node::{EdgeId, NodeId};

/// Change notifications queued by the graph store.
///
/// The store never calls out while mutating; events pile up until the
/// owner drains them with [`GraphStore::take_events`](crate::GraphStore::take_events).
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
    NodeAdded(NodeId),
    NodeRemoved(NodeId),
    /// Label, size, position or kind-specific data changed in place.
    NodeChanged(NodeId),
    Reparented {
        id: NodeId,
        from: Option<NodeId>,
        to: Option<NodeId>,
    },
    EdgeAdded(EdgeId),
    EdgeRemoved(EdgeId),
    EdgeChanged(EdgeId),
    /// Stage display numbers were re-sequenced.
    Renumbered,
}
