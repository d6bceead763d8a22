use crate::default_graph::default_graph;
use crate::drag::{place_from_pool, DragController, DragPayload, DragState};
use crate::render::{render, RenderSnapshot};
use crate::{BuilderEvent, EditField, EditSession, LabelEditor, Settings, TaskPool, Viewport};
use glam::Vec2;
use graph::{revalidate, settle, GraphSnapshot, GraphStore, Placement, Removal};
use interchange::{MemorySlot, Persistence, Slot};
use node::{
    CanvasPoint, CanvasSize, EdgeId, EdgeStyle, HandleId, Node, NodeId, NodeKind, NodeSpec,
    ScreenPoint, TaskPoolEntry,
};

/// An editing session over one workflow graph.
///
/// Owns the graph, the pool of unplaced tasks, the viewport and the
/// transient drag and edit state. Every committed graph change is saved
/// before the method returns.
pub struct WorkflowBuilder {
    settings: Settings,
    store: GraphStore,
    pool: TaskPool,
    viewport: Viewport,
    drag: DragController,
    editor: LabelEditor,
    persistence: Persistence,
    /// Toolbar-created nodes so far, for the spawn cascade
    spawned: u32,
    events: Vec<BuilderEvent>,
}

impl WorkflowBuilder {
    /// A builder that keeps its document in memory only.
    pub fn new(settings: Settings) -> Self {
        Self::open(settings, Box::new(MemorySlot::new()))
    }

    /// Open the workflow saved in `slot` under the configured key, or the
    /// default graph if there is none (or it can't be read).
    pub fn open(settings: Settings, slot: Box<dyn Slot>) -> Self {
        let persistence = Persistence::new(slot, settings.storage_key.clone());
        Self::with_persistence(settings, persistence)
    }

    pub fn with_persistence(settings: Settings, persistence: Persistence) -> Self {
        let sizes = settings.sizes.clone();
        let store = match persistence.load(&|kind| sizes.for_kind(kind)) {
            Some(store) => {
                log::info!(
                    "Loaded workflow '{}' with {} node(s)",
                    persistence.key(),
                    store.node_count()
                );
                store
            }
            None => {
                log::info!("No saved workflow in '{}', using the default graph", persistence.key());
                default_graph(&settings)
            }
        };

        let pool = unplaced_tasks(&settings, &store);

        Self {
            viewport: Viewport::with_zoom_limits(settings.min_zoom, settings.max_zoom),
            settings,
            store,
            pool,
            drag: DragController::new(),
            editor: LabelEditor::new(),
            persistence,
            spawned: 0,
            events: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.store.snapshot()
    }

    pub fn render(&self) -> RenderSnapshot {
        render(
            &self.store,
            &self.viewport,
            self.drag.preview(),
            self.editor.session(),
        )
    }

    pub fn pool(&self) -> &TaskPool {
        &self.pool
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.state()
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.session()
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    /// Drain queued notifications.
    pub fn take_events(&mut self) -> Vec<BuilderEvent> {
        std::mem::take(&mut self.events)
    }

    // === Toolbar ===

    /// Add a stage. `at` defaults to the next spawn point; a non-finite `at`
    /// creates nothing.
    pub fn add_stage(
        &mut self,
        label: impl Into<String>,
        at: Option<CanvasPoint>,
    ) -> Option<NodeId> {
        let at = at.unwrap_or_else(|| self.next_spawn_point());
        let spec = NodeSpec::stage(at, self.settings.sizes.stage).with_label(label);
        self.add_from_toolbar(spec)
    }

    pub fn add_conditional(
        &mut self,
        label: impl Into<String>,
        at: Option<CanvasPoint>,
    ) -> Option<NodeId> {
        let at = at.unwrap_or_else(|| self.next_spawn_point());
        let spec = NodeSpec::conditional(at, self.settings.sizes.conditional).with_label(label);
        self.add_from_toolbar(spec)
    }

    pub fn add_error_handler(
        &mut self,
        label: impl Into<String>,
        description: impl Into<String>,
        at: Option<CanvasPoint>,
    ) -> Option<NodeId> {
        let at = at.unwrap_or_else(|| self.next_spawn_point());
        let mut spec =
            NodeSpec::error_handler(at, self.settings.sizes.error_handler).with_label(label);
        spec.kind = NodeKind::error_handler(description);
        self.add_from_toolbar(spec)
    }

    /// New toolbar nodes open straight into label editing.
    fn add_from_toolbar(&mut self, spec: NodeSpec) -> Option<NodeId> {
        let id = self.store.add_node(spec)?;
        self.commit();
        self.begin_edit(&id, EditField::Label);
        Some(id)
    }

    fn next_spawn_point(&mut self) -> CanvasPoint {
        let step = (self.spawned % self.settings.spawn_wrap.max(1)) as f32;
        self.spawned += 1;
        CanvasPoint(self.settings.spawn_origin.0 + self.settings.spawn_offset.0 * step)
    }

    // === Drag and drop ===

    /// One-shot drop of a payload the host carried through its own drag
    /// session. Pool payloads place a new task card; canvas payloads move
    /// the named node so its top-left corner lands under the pointer.
    pub fn drop_on_canvas(&mut self, payload: &str, pointer: ScreenPoint) -> Option<NodeId> {
        self.drag.cancel();
        match DragPayload::decode(payload)? {
            DragPayload::Pool { entry_id } => {
                let size = self.settings.sizes.task_card;
                let placed = place_from_pool(
                    &mut self.store,
                    &mut self.pool,
                    &self.viewport,
                    &entry_id,
                    pointer,
                    size,
                )?;
                self.after_pool_drop(placed.node_id)
            }
            DragPayload::Canvas { node_id } => {
                let origin = self.viewport.screen_to_canvas(pointer);
                let placement = settle(&mut self.store, &node_id, origin)?;
                log::debug!("Dropped {} on the canvas: {:?}", node_id, placement);
                self.commit();
                Some(node_id)
            }
        }
    }

    pub fn begin_pool_drag(&mut self, payload: &str) -> bool {
        let Some(payload) = DragPayload::decode(payload) else {
            self.drag.cancel();
            return false;
        };
        self.drag.begin_pool_drag(&self.pool, &payload)
    }

    pub fn drop_pool_drag(&mut self, pointer: ScreenPoint, on_surface: bool) -> Option<NodeId> {
        let size = self.settings.sizes.task_card;
        let placed = self.drag.drop_pool_drag(
            &mut self.store,
            &mut self.pool,
            &self.viewport,
            pointer,
            on_surface,
            size,
        )?;
        self.after_pool_drop(placed.node_id)
    }

    fn after_pool_drop(&mut self, id: NodeId) -> Option<NodeId> {
        self.commit();
        self.events.push(BuilderEvent::PoolEntryConsumed(id.clone()));
        Some(id)
    }

    pub fn begin_node_drag(&mut self, id: &NodeId, pointer: ScreenPoint) -> bool {
        self.drag.begin_node_drag(&self.store, id, pointer)
    }

    pub fn update_node_drag(&mut self, pointer: ScreenPoint) -> bool {
        self.drag.update_node_drag(&self.viewport, pointer)
    }

    pub fn end_node_drag(&mut self, pointer: ScreenPoint) -> Option<(NodeId, Placement)> {
        let result = self.drag.end_node_drag(&mut self.store, &self.viewport, pointer);
        self.commit();
        result
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    // === Deletion ===

    /// Delete a node. Stages take their task cards and all incident edges
    /// with them; removed task cards go back to the pool.
    pub fn delete_node(&mut self, id: &NodeId) -> Removal {
        let removal = self.store.remove_node(id);
        if removal.is_empty() {
            return removal;
        }

        let removed = removal.node_ids();
        if self.drag.preview().is_some_and(|(dragged, _)| removed.contains(dragged)) {
            self.drag.cancel();
        }
        if self.edit_session().is_some_and(|s| removed.contains(&s.node_id)) {
            self.cancel_edit();
        }

        self.commit();
        for node in &removal.nodes {
            if let Some(entry) = TaskPoolEntry::from_node(node) {
                let id = entry.id.clone();
                if self.pool.give_back(entry) {
                    self.events.push(BuilderEvent::PoolEntryReturned(id));
                }
            }
        }
        removal
    }

    // === Edges ===

    pub fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        source_handle: Option<HandleId>,
        target_handle: Option<HandleId>,
    ) -> Option<EdgeId> {
        let id = self.store.add_edge(source, target, source_handle, target_handle);
        self.commit();
        id
    }

    pub fn disconnect(&mut self, id: &EdgeId) -> bool {
        let removed = self.store.remove_edge(id).is_some();
        self.commit();
        removed
    }

    pub fn set_edge_style(&mut self, id: &EdgeId, style: Option<EdgeStyle>) -> bool {
        let changed = self.store.update_edge_style(id, style);
        self.commit();
        changed
    }

    // === Sizes ===

    /// Resize a stage. Task cards that no longer fit are re-resolved.
    pub fn resize_stage(&mut self, id: &NodeId, size: CanvasSize) -> bool {
        if !self.store.node(id).is_some_and(Node::is_stage) {
            return false;
        }
        if !self.store.update_node_size(id, size) {
            return false;
        }
        let children: Vec<NodeId> = self.store.children_of(id).map(|n| n.id.clone()).collect();
        revalidate(&mut self.store, &children);
        self.commit();
        true
    }

    /// Record the size the host measured for a non-stage node.
    pub fn set_measured_size(&mut self, id: &NodeId, size: CanvasSize) -> bool {
        let Some(node) = self.store.node(id) else {
            return false;
        };
        if node.is_stage() {
            return false;
        }
        let parented = node.parent_id().is_some();
        if !self.store.update_node_size(id, size) {
            return false;
        }
        if parented {
            revalidate(&mut self.store, std::slice::from_ref(id));
        }
        self.commit();
        true
    }

    // === Editing ===

    /// Open an edit session, discarding any open one.
    pub fn begin_edit(&mut self, id: &NodeId, field: EditField) -> bool {
        let Some(session) = EditSession::open(&self.store, id, field) else {
            return false;
        };
        if let Some(previous) = self.editor.start(session) {
            self.events.push(BuilderEvent::EditClosed {
                node_id: previous.node_id,
                committed: false,
            });
        }
        self.events.push(BuilderEvent::EditOpened {
            node_id: id.clone(),
            field,
        });
        true
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) -> bool {
        self.editor.set_draft(draft)
    }

    /// Commit the draft and close the session. Returns whether the graph changed.
    pub fn save_edit(&mut self) -> bool {
        let Some((session, committed)) = self.editor.save(&mut self.store) else {
            return false;
        };
        self.commit();
        self.events.push(BuilderEvent::EditClosed {
            node_id: session.node_id,
            committed,
        });
        committed
    }

    pub fn cancel_edit(&mut self) -> bool {
        let Some(session) = self.editor.cancel() else {
            return false;
        };
        self.events.push(BuilderEvent::EditClosed {
            node_id: session.node_id,
            committed: false,
        });
        true
    }

    // === Viewport ===

    /// Pan by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.viewport.pan(delta);
    }

    pub fn zoom_at(&mut self, pointer: ScreenPoint, factor: f32) {
        self.viewport.zoom_at(pointer, factor);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    // === Lifecycle ===

    /// Forget the saved workflow and start over from the default graph.
    pub fn reset(&mut self) {
        if let Err(e) = self.persistence.clear() {
            log::warn!("Failed to clear saved workflow: {}", e);
        }
        self.drag.cancel();
        self.cancel_edit();
        self.store = default_graph(&self.settings);
        self.pool = unplaced_tasks(&self.settings, &self.store);
        self.spawned = 0;
        self.events.push(BuilderEvent::Reset);
        log::info!("Workflow reset to the default graph");
    }

    /// Forward graph changes to subscribers and write the document through.
    fn commit(&mut self) {
        let changes = self.store.take_events();
        if changes.is_empty() {
            return;
        }
        self.events.extend(changes.into_iter().map(BuilderEvent::from));
        if let Err(e) = self.persistence.save(&self.store.snapshot()) {
            log::warn!("Failed to save workflow: {}", e);
        }
    }
}

/// The configured pool minus the tasks already placed as cards.
fn unplaced_tasks(settings: &Settings, store: &GraphStore) -> TaskPool {
    let mut pool = TaskPool::new(settings.task_pool.clone());
    pool.retain_unplaced(|id| store.node(id).is_some_and(Node::is_task_card));
    pool
}
