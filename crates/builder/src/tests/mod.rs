mod cascade_test;
mod edit_test;
mod pool_test;

use crate::{DragPayload, Settings, WorkflowBuilder};
use interchange::{MemorySlot, Slot, DEFAULT_STORAGE_KEY};
use node::{NodeId, TaskPoolEntry};

const EMPTY_DOCUMENT: &str = r#"{"version":1,"nodes":[],"edges":[]}"#;

fn settings_with_pool(ids: &[&str]) -> Settings {
    Settings {
        task_pool: ids
            .iter()
            .map(|id| TaskPoolEntry::new(*id, format!("Task {id}"), "Ops"))
            .collect(),
        ..Settings::default()
    }
}

/// A builder over an empty saved workflow, so the default graph stays out of the way.
fn empty_builder(pool: &[&str]) -> WorkflowBuilder {
    let slot = MemorySlot::new();
    slot.write(DEFAULT_STORAGE_KEY, EMPTY_DOCUMENT).unwrap();
    WorkflowBuilder::open(settings_with_pool(pool), Box::new(slot))
}

fn pool_payload(id: &str) -> String {
    DragPayload::Pool {
        entry_id: NodeId::from(id),
    }
    .to_string()
}

/// Every parented task card lies strictly inside its stage.
fn assert_containment(builder: &WorkflowBuilder) {
    let store = builder.store();
    for node in store.nodes() {
        let Some(parent) = node.parent_id() else {
            continue;
        };
        assert!(node.is_task_card(), "{} is parented but not a task card", node.id);
        let stage = store.node(parent).expect("parent exists");
        assert!(stage.is_stage());
        let outer = store.absolute_bounds(parent).unwrap();
        let inner = store.absolute_bounds(&node.id).unwrap();
        assert!(outer.strictly_contains(&inner), "{} escaped {}", node.id, parent);
    }
}

/// Every configured id is either pooled or on the canvas, never both.
fn assert_disjoint(builder: &WorkflowBuilder, ids: &[&str]) {
    for id in ids {
        let id = NodeId::from(*id);
        let pooled = builder.pool().contains(&id);
        let placed = builder.node(&id).is_some_and(|n| n.is_task_card());
        assert!(pooled != placed, "{id} pooled={pooled} placed={placed}");
    }
}
