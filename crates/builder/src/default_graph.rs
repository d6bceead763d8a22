use crate::Settings;
use graph::GraphStore;
use node::{CanvasPoint, NodeId, NodeSpec, CONDITIONAL_FALSE, CONDITIONAL_TRUE};

/// The starter workflow shown when nothing has been saved yet: two stages
/// feeding an approval branch with an escalation path.
///
/// Ids are fixed so scripts can address the starter nodes before anything
/// has been saved.
pub fn default_graph(settings: &Settings) -> GraphStore {
    let sizes = &settings.sizes;
    let mut store = GraphStore::new();

    let intake = insert(
        &mut store,
        "stage-intake",
        NodeSpec::stage(CanvasPoint::new(80.0, 60.0), sizes.stage).with_label("Intake"),
    );
    let review = insert(
        &mut store,
        "stage-review",
        NodeSpec::stage(CanvasPoint::new(380.0, 60.0), sizes.stage).with_label("Review"),
    );
    let approved = insert(
        &mut store,
        "branch-approved",
        NodeSpec::conditional(CanvasPoint::new(680.0, 90.0), sizes.conditional)
            .with_label("Approved?"),
    );
    let fulfil = insert(
        &mut store,
        "stage-fulfilment",
        NodeSpec::stage(CanvasPoint::new(900.0, 60.0), sizes.stage).with_label("Fulfilment"),
    );
    let escalate = insert(
        &mut store,
        "error-escalate",
        NodeSpec::error_handler(CanvasPoint::new(660.0, 260.0), sizes.error_handler)
            .with_label("Escalate"),
    );
    store.update_description(&escalate, "Notify the process owner");

    let edges = [
        (&intake, &review, None),
        (&review, &approved, None),
        (&approved, &fulfil, Some(CONDITIONAL_TRUE)),
        (&approved, &escalate, Some(CONDITIONAL_FALSE)),
    ];
    for (source, target, handle) in edges {
        store.add_edge(source, target, handle.map(str::to_string), None);
    }

    store.take_events();
    store
}

fn insert(store: &mut GraphStore, id: &str, spec: NodeSpec) -> NodeId {
    let id = NodeId::from(id);
    store.insert_node_with_id(id.clone(), spec);
    id
}
