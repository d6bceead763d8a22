//! Deciding which stage owns a task card.
//!
//! A box belongs to a stage when it lies strictly inside the stage's box.
//! When several stages qualify, the one earliest in the node list wins, so
//! overlapping stages always resolve the same way. All comparisons happen in
//! canvas space.

use crate::GraphStore;
use node::{Bounds, CanvasPoint, NodeId, Position};

/// A stage that may receive a dropped node, with its box in canvas space.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub id: NodeId,
    pub bounds: Bounds,
}

/// Outcome of committing a move through [`settle`].
#[derive(Clone, Debug, PartialEq)]
pub enum Placement {
    /// Nothing changed.
    Unchanged,
    /// The node moved within its existing frame.
    Moved,
    /// The node changed owner; its position was converted to the new frame.
    Reparented {
        from: Option<NodeId>,
        to: Option<NodeId>,
    },
}

/// First candidate that strictly contains `bounds`.
pub fn resolve_parent<'a>(
    bounds: &Bounds,
    candidates: impl IntoIterator<Item = &'a Candidate>,
) -> Option<NodeId> {
    candidates
        .into_iter()
        .find(|candidate| candidate.bounds.strictly_contains(bounds))
        .map(|candidate| candidate.id.clone())
}

/// Every stage in node-list order.
pub fn candidate_stages(store: &GraphStore) -> Vec<Candidate> {
    store
        .stages()
        .filter_map(|stage| {
            Some(Candidate {
                id: stage.id.clone(),
                bounds: store.absolute_bounds(&stage.id)?,
            })
        })
        .collect()
}

/// Resolve the owner for `node_id` if its box were at `bounds`.
pub fn resolve_parent_for(store: &GraphStore, node_id: &NodeId, bounds: &Bounds) -> Option<NodeId> {
    let candidates: Vec<Candidate> = candidate_stages(store)
        .into_iter()
        .filter(|candidate| &candidate.id != node_id)
        .collect();
    resolve_parent(bounds, &candidates)
}

/// Commit a move that puts the node's top-left corner at `origin` (canvas space).
///
/// Task cards are re-resolved against every stage: a different owner (or
/// losing the owner) reparents with the position converted into the new
/// frame, the same owner keeps the parent and only moves. Every other kind
/// moves freely on the canvas and never changes owner.
pub fn settle(store: &mut GraphStore, id: &NodeId, origin: CanvasPoint) -> Option<Placement> {
    if !origin.0.is_finite() {
        log::warn!("Ignoring move of {} to a non-finite position", id);
        return None;
    }
    let node = store.node(id)?;
    let current = node.parent_id().cloned();

    if !node.is_task_card() {
        let moved = store.update_node_position(id, Position::Absolute(origin));
        return Some(if moved { Placement::Moved } else { Placement::Unchanged });
    }

    let bounds = Bounds::from_origin_size(origin, node.size);
    let resolved = resolve_parent_for(store, id, &bounds);
    let to = match &resolved {
        Some(parent) => Position::Relative {
            parent: parent.clone(),
            offset: origin.to_local(store.absolute_position(parent)?),
        },
        None => Position::Absolute(origin),
    };

    if resolved == current {
        let moved = store.update_node_position(id, to);
        return Some(if moved { Placement::Moved } else { Placement::Unchanged });
    }

    if !store.reparent(id, to) {
        return None;
    }
    Some(Placement::Reparented {
        from: current,
        to: resolved,
    })
}

/// Re-run containment for task cards whose owner may no longer hold them,
/// e.g. after a stage shrank or a card grew. Returns the cards that changed
/// owner.
pub fn revalidate(store: &mut GraphStore, ids: &[NodeId]) -> Vec<NodeId> {
    let mut changed = Vec::new();
    for id in ids {
        let Some(origin) = store.absolute_position(id) else {
            continue;
        };
        if let Some(Placement::Reparented { .. }) = settle(store, id, origin) {
            changed.push(id.clone());
        }
    }
    changed
}
