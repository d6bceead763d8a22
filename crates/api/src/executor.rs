//! Command and query execution against a WorkflowBuilder.
//!
//! This module connects the abstract Command/Query types to the builder,
//! executing operations and returning results.

use crate::{Command, CommandResult, NodeInfo, NodeQuery, Query, QueryResult, Target};
use builder::WorkflowBuilder;
use glam::Vec2;
use graph::Placement;
use node::{Bounds, CanvasPoint, CanvasSize, Node, NodeId, ScreenPoint};
use serde::Serialize;

/// Execute a command against a builder.
pub fn execute_command(builder: &mut WorkflowBuilder, command: Command) -> CommandResult {
    match command {
        Command::AddStage { label, position } => {
            let id = builder.add_stage(label, position.map(CanvasPoint));
            created_or_rejected(id)
        }

        Command::AddConditional { label, position } => {
            let id = builder.add_conditional(label, position.map(CanvasPoint));
            created_or_rejected(id)
        }

        Command::AddErrorHandler {
            label,
            description,
            position,
        } => {
            let id = builder.add_error_handler(label, description, position.map(CanvasPoint));
            created_or_rejected(id)
        }

        Command::DropTask { entry_id, pointer } => {
            if !builder.pool().contains(&entry_id) {
                return CommandResult::error(format!("No task '{}' in the pool", entry_id));
            }
            let payload = builder::DragPayload::Pool { entry_id }.to_string();
            match builder.drop_on_canvas(&payload, ScreenPoint(pointer)) {
                Some(id) => CommandResult::created(vec![id]),
                None => CommandResult::error("Drop rejected"),
            }
        }

        Command::BeginDrag { node_id, pointer } => {
            if builder.begin_node_drag(&node_id, ScreenPoint(pointer)) {
                CommandResult::success()
            } else {
                CommandResult::error(format!("No node '{}'", node_id))
            }
        }

        Command::UpdateDrag { pointer } => {
            if builder.update_node_drag(ScreenPoint(pointer)) {
                CommandResult::success()
            } else {
                CommandResult::error("No drag in progress")
            }
        }

        Command::EndDrag { pointer } => match builder.end_node_drag(ScreenPoint(pointer)) {
            Some((_, Placement::Unchanged)) => CommandResult::success(),
            Some((id, _)) => CommandResult::modified(vec![id]),
            None => CommandResult::success(),
        },

        Command::CancelDrag => {
            builder.cancel_drag();
            CommandResult::success()
        }

        Command::Delete { target } => {
            let ids = resolve_target(builder, &target);
            let mut deleted = Vec::new();
            let mut deleted_edges = Vec::new();
            for id in ids {
                let removal = builder.delete_node(&id);
                deleted.extend(removal.node_ids());
                deleted_edges.extend(removal.edges.into_iter().map(|e| e.id));
            }
            CommandResult::deleted(deleted, deleted_edges)
        }

        Command::Connect {
            source,
            target,
            source_handle,
            target_handle,
        } => match builder.connect(&source, &target, source_handle, target_handle) {
            Some(id) => CommandResult::edge_created(id),
            None => CommandResult::error(format!("Cannot connect '{}' to '{}'", source, target)),
        },

        Command::Disconnect { edge_id } => {
            if builder.disconnect(&edge_id) {
                CommandResult::edge_deleted(edge_id)
            } else {
                CommandResult::success()
            }
        }

        Command::SetEdgeStyle { edge_id, style } => {
            builder.set_edge_style(&edge_id, style);
            CommandResult::success()
        }

        Command::ResizeStage { node_id, size } => {
            if builder.resize_stage(&node_id, CanvasSize(size)) {
                CommandResult::modified(vec![node_id])
            } else {
                CommandResult::success()
            }
        }

        Command::SetMeasuredSize { node_id, size } => {
            if builder.set_measured_size(&node_id, CanvasSize(size)) {
                CommandResult::modified(vec![node_id])
            } else {
                CommandResult::success()
            }
        }

        Command::BeginEdit { node_id, field } => {
            if builder.begin_edit(&node_id, field) {
                CommandResult::success()
            } else {
                CommandResult::error(format!("Node '{}' has no {} to edit", node_id, field))
            }
        }

        Command::SetDraft { draft } => {
            if builder.set_draft(draft) {
                CommandResult::success()
            } else {
                CommandResult::error("No edit session is open")
            }
        }

        Command::SaveEdit => {
            let node_id = builder.edit_session().map(|s| s.node_id.clone());
            match node_id {
                Some(id) if builder.save_edit() => CommandResult::modified(vec![id]),
                _ => CommandResult::success(),
            }
        }

        Command::CancelEdit => {
            builder.cancel_edit();
            CommandResult::success()
        }

        Command::Pan { delta } => {
            builder.pan(delta);
            CommandResult::success()
        }

        Command::Zoom { factor, center } => {
            let center = center.unwrap_or(Vec2::ZERO);
            builder.zoom_at(ScreenPoint(center), factor);
            CommandResult::success()
        }

        Command::ResetView => {
            builder.reset_view();
            CommandResult::success()
        }

        Command::Batch { commands } => {
            let mut all_created = Vec::new();
            let mut all_modified = Vec::new();
            let mut all_deleted = Vec::new();
            let mut all_created_edges = Vec::new();
            let mut all_deleted_edges = Vec::new();

            for cmd in commands {
                match execute_command(builder, cmd) {
                    CommandResult::Success {
                        created,
                        modified,
                        deleted,
                        created_edges,
                        deleted_edges,
                    } => {
                        all_created.extend(created);
                        all_modified.extend(modified);
                        all_deleted.extend(deleted);
                        all_created_edges.extend(created_edges);
                        all_deleted_edges.extend(deleted_edges);
                    }
                    CommandResult::Error { message } => {
                        return CommandResult::error(format!("Batch failed: {}", message));
                    }
                }
            }

            CommandResult::Success {
                created: all_created,
                modified: all_modified,
                deleted: all_deleted,
                created_edges: all_created_edges,
                deleted_edges: all_deleted_edges,
            }
        }
    }
}

fn created_or_rejected(id: Option<NodeId>) -> CommandResult {
    match id {
        Some(id) => CommandResult::created(vec![id]),
        None => CommandResult::error("Position must be finite"),
    }
}

/// Execute a query against a builder.
pub fn execute_query(builder: &WorkflowBuilder, query: Query) -> QueryResult {
    match query {
        Query::GetSnapshot => QueryResult::Snapshot {
            snapshot: builder.render(),
        },

        Query::GetNode { id } => QueryResult::Node {
            node: builder.node(&id).map(|n| node_to_info(builder, n)),
        },

        Query::GetNodes { target } => {
            let ids = resolve_target(builder, &target);
            QueryResult::Nodes {
                nodes: builder
                    .store()
                    .nodes()
                    .filter(|n| ids.contains(&n.id))
                    .map(|n| node_to_info(builder, n))
                    .collect(),
            }
        }

        Query::GetEdges => QueryResult::Edges {
            edges: builder.store().edges().cloned().collect(),
        },

        Query::GetPool => QueryResult::Pool {
            entries: builder.pool().entries().to_vec(),
        },

        Query::GetEditSession => QueryResult::EditSession {
            session: builder.edit_session().cloned(),
        },

        Query::GetViewport => QueryResult::Viewport {
            viewport: builder.viewport().clone(),
        },

        Query::GetNodeCount => QueryResult::Count {
            count: builder.store().node_count(),
        },
    }
}

/// Parse a JSON document as a command, falling back to a query, execute it
/// and serialize the result.
pub fn execute_json(
    builder: &mut WorkflowBuilder,
    json: &str,
) -> Result<String, serde_json::Error> {
    log::debug!("api request: {}", json);
    if let Ok(command) = serde_json::from_str::<Command>(json) {
        return to_json(&execute_command(builder, command));
    }
    let query: Query = serde_json::from_str(json)?;
    to_json(&execute_query(builder, query))
}

fn to_json(value: &impl Serialize) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Resolve a target to a list of node IDs.
fn resolve_target(builder: &WorkflowBuilder, target: &Target) -> Vec<NodeId> {
    match target {
        Target::Node(id) => vec![id.clone()],
        Target::Nodes(ids) => ids.clone(),
        Target::All => builder.store().nodes().map(|n| n.id.clone()).collect(),
        Target::Query(query) => resolve_node_query(builder, query),
    }
}

/// Resolve a node query to matching IDs.
fn resolve_node_query(builder: &WorkflowBuilder, query: &NodeQuery) -> Vec<NodeId> {
    let store = builder.store();
    match query {
        NodeQuery::ByKind(kind) => store
            .nodes()
            .filter(|n| n.tag() == *kind)
            .map(|n| n.id.clone())
            .collect(),
        NodeQuery::ByLabel(label) => store
            .nodes()
            .filter(|n| &n.label == label)
            .map(|n| n.id.clone())
            .collect(),
        NodeQuery::InBounds {
            x,
            y,
            width,
            height,
        } => {
            let area = Bounds::from_origin_size(
                CanvasPoint::new(*x, *y),
                CanvasSize::new(*width, *height),
            );
            store
                .nodes()
                .filter(|n| store.absolute_bounds(&n.id).is_some_and(|b| b.intersects(&area)))
                .map(|n| n.id.clone())
                .collect()
        }
        NodeQuery::ChildrenOf(target) => {
            let parent_ids = resolve_target(builder, target);
            store
                .nodes()
                .filter(|n| n.parent_id().is_some_and(|p| parent_ids.contains(p)))
                .map(|n| n.id.clone())
                .collect()
        }
        NodeQuery::ParentOf(target) => {
            let child_ids = resolve_target(builder, target);
            let mut parent_ids: Vec<NodeId> = Vec::new();
            for node in store.nodes() {
                if !child_ids.contains(&node.id) {
                    continue;
                }
                if let Some(parent_id) = node.parent_id() {
                    if !parent_ids.contains(parent_id) {
                        parent_ids.push(parent_id.clone());
                    }
                }
            }
            parent_ids
        }
    }
}

/// Convert a Node to NodeInfo for query results.
fn node_to_info(builder: &WorkflowBuilder, node: &Node) -> NodeInfo {
    let position = builder
        .store()
        .absolute_position(&node.id)
        .map(|p| p.0)
        .unwrap_or_else(|| node.position.raw());
    NodeInfo {
        id: node.id.clone(),
        kind: node.tag(),
        label: node.label.clone(),
        position,
        size: node.size.0,
        parent_id: node.parent_id().cloned(),
        local_position: node.parent_id().map(|_| node.position.raw()),
        display_number: node.display_number(),
        department: node.department().map(str::to_string),
        description: node.description().map(str::to_string),
    }
}
