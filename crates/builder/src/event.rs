use crate::EditField;
use graph::GraphEvent;
use node::NodeId;

/// Notifications emitted by the builder, drained with
/// [`WorkflowBuilder::take_events`](crate::WorkflowBuilder::take_events).
#[derive(Clone, Debug, PartialEq)]
pub enum BuilderEvent {
    Graph(GraphEvent),
    /// A pool entry was placed on the canvas as a task card.
    PoolEntryConsumed(NodeId),
    /// A removed task card went back to the pool.
    PoolEntryReturned(NodeId),
    EditOpened {
        node_id: NodeId,
        field: EditField,
    },
    EditClosed {
        node_id: NodeId,
        committed: bool,
    },
    /// The saved workflow was discarded and the default graph loaded.
    Reset,
}

impl From<GraphEvent> for BuilderEvent {
    fn from(event: GraphEvent) -> Self {
        Self::Graph(event)
    }
}
