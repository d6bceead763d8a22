//! Stage deletion.
//!
//! Deleting a stage removes the stage, every task card it owns, and every
//! edge touching any of them, then re-sequences the remaining stages so
//! their display numbers stay 1..N. The whole thing runs inside one
//! `&mut GraphStore` borrow, so no caller can observe a half-deleted stage.

use crate::{GraphEvent, GraphStore, Removal};
use node::NodeId;

pub fn delete_stage(store: &mut GraphStore, stage_id: &NodeId) -> Removal {
    if !store.node(stage_id).is_some_and(|n| n.is_stage()) {
        return Removal::default();
    }

    let mut doomed = vec![stage_id.clone()];
    doomed.extend(store.children_of(stage_id).map(|n| n.id.clone()));
    log::debug!("Deleting stage {} with {} task card(s)", stage_id, doomed.len() - 1);

    let removal = store.detach(&doomed);
    renumber_stages(store);
    removal
}

/// Re-sequence stage display numbers as 1..N in node-list order.
///
/// Returns whether any number changed.
pub fn renumber_stages(store: &mut GraphStore) -> bool {
    let stage_ids: Vec<NodeId> = store.stages().map(|n| n.id.clone()).collect();
    let mut changed = false;
    for (index, id) in stage_ids.iter().enumerate() {
        changed |= store.set_display_number(id, index as u32 + 1);
    }
    if changed {
        store.push_event(GraphEvent::Renumbered);
    }
    changed
}
