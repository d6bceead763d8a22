//! Drag-and-drop.
//!
//! Two sources feed the canvas: entries dragged out of the task pool, and
//! nodes dragged around on the canvas itself. Both are transient; the graph
//! only changes when a drag ends, so a cancelled drag leaves it untouched.

use crate::{TaskPool, Viewport};
use graph::{candidate_stages, resolve_parent, settle, GraphStore, Placement};
use node::{Bounds, CanvasSize, NodeId, Position, ScreenPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the host carries through its drag/drop data transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DragPayload {
    Pool { entry_id: NodeId },
    Canvas { node_id: NodeId },
}

impl DragPayload {
    /// `None` for anything that is not a payload we produced.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::warn!("Ignoring drag payload {:?}: {}", raw, e);
                None
            }
        }
    }
}

impl fmt::Display for DragPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Active drag operation.
#[derive(Clone, Debug, PartialEq)]
pub enum DragState {
    /// Dragging a node that is already on the canvas
    MovingNode {
        node_id: NodeId,
        start_pointer: ScreenPoint,
        /// Position before the drag, in the pre-drag frame
        start_position: Position,
        /// Where the node would land if released now
        preview: Position,
    },
    /// Carrying a pool entry over the canvas
    FromPool { entry_id: NodeId },
}

/// A committed pool placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolDrop {
    pub node_id: NodeId,
    pub parent: Option<NodeId>,
}

#[derive(Clone, Debug, Default)]
pub struct DragController {
    state: Option<DragState>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Node id and preview position of the node being moved, if any.
    pub fn preview(&self) -> Option<(&NodeId, &Position)> {
        match &self.state {
            Some(DragState::MovingNode { node_id, preview, .. }) => Some((node_id, preview)),
            _ => None,
        }
    }

    /// Drop whatever drag is in flight. The graph is never touched.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.state.take().is_some();
        if cancelled {
            log::debug!("Drag cancelled");
        }
        cancelled
    }

    // === Canvas → Canvas ===

    pub fn begin_node_drag(
        &mut self,
        store: &GraphStore,
        node_id: &NodeId,
        pointer: ScreenPoint,
    ) -> bool {
        self.cancel();
        let Some(node) = store.node(node_id) else {
            return false;
        };
        self.state = Some(DragState::MovingNode {
            node_id: node_id.clone(),
            start_pointer: pointer,
            start_position: node.position.clone(),
            preview: node.position.clone(),
        });
        true
    }

    pub fn update_node_drag(&mut self, viewport: &Viewport, pointer: ScreenPoint) -> bool {
        let Some(DragState::MovingNode {
            start_pointer,
            start_position,
            preview,
            ..
        }) = &mut self.state
        else {
            return false;
        };
        let delta = viewport.screen_delta_to_canvas(*start_pointer, pointer);
        *preview = start_position.translated(delta);
        true
    }

    /// Commit the move. Only task cards can change owner; everything else
    /// moves freely on the canvas.
    pub fn end_node_drag(
        &mut self,
        store: &mut GraphStore,
        viewport: &Viewport,
        pointer: ScreenPoint,
    ) -> Option<(NodeId, Placement)> {
        if !matches!(self.state, Some(DragState::MovingNode { .. })) {
            return None;
        }
        self.update_node_drag(viewport, pointer);
        let Some(DragState::MovingNode { node_id, preview, .. }) = self.state.take() else {
            return None;
        };

        // The preview is in the pre-drag frame, so resolve it against the
        // parent the node had when the drag began.
        if !store.contains_node(&node_id) {
            return None;
        }
        let parent_world = preview.parent().and_then(|p| store.absolute_position(p));
        let origin = preview.to_canvas(parent_world);
        let placement = settle(store, &node_id, origin)?;
        log::debug!("Drag of {} ended: {:?}", node_id, placement);
        Some((node_id, placement))
    }

    // === Pool → Canvas ===

    pub fn begin_pool_drag(&mut self, pool: &TaskPool, payload: &DragPayload) -> bool {
        self.cancel();
        let DragPayload::Pool { entry_id } = payload else {
            return false;
        };
        if !pool.contains(entry_id) {
            log::warn!("Pool drag for unknown entry {}", entry_id);
            return false;
        }
        self.state = Some(DragState::FromPool {
            entry_id: entry_id.clone(),
        });
        true
    }

    /// Finish a pool drag. Released outside the canvas surface counts as a
    /// cancel.
    pub fn drop_pool_drag(
        &mut self,
        store: &mut GraphStore,
        pool: &mut TaskPool,
        viewport: &Viewport,
        pointer: ScreenPoint,
        on_surface: bool,
        size: CanvasSize,
    ) -> Option<PoolDrop> {
        let Some(DragState::FromPool { entry_id }) = self.state.clone() else {
            return None;
        };
        self.state = None;
        if !on_surface {
            log::debug!("Pool entry {} released off the canvas", entry_id);
            return None;
        }
        place_from_pool(store, pool, viewport, &entry_id, pointer, size)
    }
}

/// Turn a pool entry into a task card whose top-left corner sits under
/// `pointer`, owned by whichever stage fully contains it.
pub fn place_from_pool(
    store: &mut GraphStore,
    pool: &mut TaskPool,
    viewport: &Viewport,
    entry_id: &NodeId,
    pointer: ScreenPoint,
    size: CanvasSize,
) -> Option<PoolDrop> {
    if store.contains_node(entry_id) {
        log::warn!("Pool entry {} is already on the canvas", entry_id);
        return None;
    }
    let entry = pool.get(entry_id)?;

    let origin = viewport.screen_to_canvas(pointer);
    if !origin.0.is_finite() {
        log::warn!("Ignoring drop of {} at a non-finite position", entry_id);
        return None;
    }
    let bounds = Bounds::from_origin_size(origin, size);
    let parent = resolve_parent(&bounds, &candidate_stages(store));
    let position = match &parent {
        Some(stage) => Position::Relative {
            parent: stage.clone(),
            offset: origin.to_local(store.absolute_position(stage)?),
        },
        None => Position::Absolute(origin),
    };

    let node_id = store.insert_node_with_id(entry_id.clone(), entry.to_spec(position, size))?;
    pool.take(entry_id);
    log::debug!("Placed pool entry {} under {:?}", node_id, parent);
    Some(PoolDrop { node_id, parent })
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::{CanvasPoint, NodeSpec, TaskPoolEntry};

    fn card_size() -> CanvasSize {
        CanvasSize::new(150.0, 60.0)
    }

    fn setup() -> (GraphStore, TaskPool, NodeId) {
        let mut store = GraphStore::new();
        let spec = NodeSpec::stage(CanvasPoint::new(100.0, 100.0), CanvasSize::new(220.0, 140.0));
        let stage = store.add_node(spec).unwrap();
        let pool = TaskPool::new([TaskPoolEntry::new("t", "Verify", "Finance")]);
        (store, pool, stage)
    }

    #[test]
    fn payload_wire_format() {
        let payload = DragPayload::decode(r#"{"source":"pool","entryId":"t"}"#).unwrap();
        assert_eq!(payload, DragPayload::Pool { entry_id: NodeId::from("t") });
        let canvas = DragPayload::Canvas { node_id: NodeId::from("n") };
        assert_eq!(canvas.to_string(), r#"{"source":"canvas","nodeId":"n"}"#);

        assert!(DragPayload::decode("text/plain garbage").is_none());
        assert!(DragPayload::decode(r#"{"source":"toolbar","id":"x"}"#).is_none());
    }

    #[test]
    fn pool_drop_inside_stage_is_parented() {
        let (mut store, mut pool, stage) = setup();
        let drop = place_from_pool(
            &mut store,
            &mut pool,
            &Viewport::new(),
            &NodeId::from("t"),
            ScreenPoint::new(150.0, 150.0),
            card_size(),
        )
        .unwrap();

        assert_eq!(drop.parent, Some(stage.clone()));
        assert_eq!(
            store.node(&drop.node_id).unwrap().position,
            Position::relative(stage, 50.0, 50.0)
        );
        assert!(pool.is_empty());
    }

    #[test]
    fn pool_drop_uses_viewport_transform() {
        let (mut store, mut pool, _) = setup();
        let mut viewport = Viewport::new();
        viewport.zoom_at(ScreenPoint::new(0.0, 0.0), 2.0);

        let drop = place_from_pool(
            &mut store,
            &mut pool,
            &viewport,
            &NodeId::from("t"),
            ScreenPoint::new(1200.0, 1200.0),
            card_size(),
        )
        .unwrap();
        assert_eq!(drop.parent, None);
        assert_eq!(store.absolute_position(&drop.node_id), Some(CanvasPoint::new(600.0, 600.0)));
    }

    #[test]
    fn pool_drop_off_surface_is_cancel() {
        let (mut store, mut pool, _) = setup();
        let mut drag = DragController::new();
        assert!(drag.begin_pool_drag(&pool, &DragPayload::Pool { entry_id: NodeId::from("t") }));

        let result = drag.drop_pool_drag(
            &mut store,
            &mut pool,
            &Viewport::new(),
            ScreenPoint::new(150.0, 150.0),
            false,
            card_size(),
        );
        assert!(result.is_none());
        assert!(!drag.is_active());
        assert_eq!(pool.len(), 1);
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn unknown_pool_entry_is_rejected() {
        let (_, pool, _) = setup();
        let mut drag = DragController::new();
        let unknown = DragPayload::Pool { entry_id: NodeId::from("nope") };
        assert!(!drag.begin_pool_drag(&pool, &unknown));
        assert!(!drag.begin_pool_drag(&pool, &DragPayload::Canvas { node_id: NodeId::from("t") }));
    }

    #[test]
    fn node_drag_preview_then_commit() {
        let (mut store, mut pool, stage) = setup();
        let t = place_from_pool(
            &mut store,
            &mut pool,
            &Viewport::new(),
            &NodeId::from("t"),
            ScreenPoint::new(150.0, 150.0),
            card_size(),
        )
        .unwrap()
        .node_id;

        let mut drag = DragController::new();
        let viewport = Viewport::new();
        assert!(drag.begin_node_drag(&store, &t, ScreenPoint::new(10.0, 10.0)));
        drag.update_node_drag(&viewport, ScreenPoint::new(510.0, 510.0));

        // Preview only; the graph still has the old position
        assert_eq!(drag.preview(), Some((&t, &Position::relative(stage.clone(), 550.0, 550.0))));
        assert_eq!(store.node(&t).unwrap().position, Position::relative(stage.clone(), 50.0, 50.0));

        let (id, placement) = drag
            .end_node_drag(&mut store, &viewport, ScreenPoint::new(510.0, 510.0))
            .unwrap();
        assert_eq!(id, t);
        assert_eq!(
            placement,
            Placement::Reparented {
                from: Some(stage),
                to: None,
            }
        );
        assert_eq!(store.node(&t).unwrap().position, Position::absolute(650.0, 650.0));
    }

    #[test]
    fn cancel_leaves_graph_untouched() {
        let (mut store, _, stage) = setup();
        let before = store.snapshot();
        let mut drag = DragController::new();
        drag.begin_node_drag(&store, &stage, ScreenPoint::new(0.0, 0.0));
        drag.update_node_drag(&Viewport::new(), ScreenPoint::new(300.0, 300.0));
        assert!(drag.cancel());
        let end = drag.end_node_drag(&mut store, &Viewport::new(), ScreenPoint::new(0.0, 0.0));
        assert!(end.is_none());
        assert_eq!(store.snapshot(), before);
    }
}
