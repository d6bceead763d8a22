//! Waypoint commands - all operations that modify builder state.
//!
//! Commands are intent-based: they describe what the user wants, not how
//! to achieve it. The builder decides containment, cascades deletes and
//! saves the result.

use crate::Target;
use builder::EditField;
use glam::Vec2;
use node::{EdgeId, EdgeStyle, HandleId, NodeId};
use serde::{Deserialize, Serialize};

/// A command that modifies workflow builder state.
///
/// Positions are canvas space; `pointer` values are screen space, the way a
/// host would report them.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Toolbar ===
    /// Add a stage. Without a position it lands on the next spawn point.
    AddStage {
        #[serde(default)]
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec2>,
    },

    /// Add a conditional branch.
    AddConditional {
        #[serde(default)]
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec2>,
    },

    /// Add an error handler.
    AddErrorHandler {
        #[serde(default)]
        label: String,
        #[serde(default)]
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Vec2>,
    },

    // === Drag and drop ===
    /// Drop a pool entry onto the canvas at a screen position.
    DropTask { entry_id: NodeId, pointer: Vec2 },

    /// Start dragging a node on the canvas.
    BeginDrag { node_id: NodeId, pointer: Vec2 },

    /// Move the active drag.
    UpdateDrag { pointer: Vec2 },

    /// Release the active drag and commit the move.
    EndDrag { pointer: Vec2 },

    /// Abandon the active drag.
    CancelDrag,

    // === Structure ===
    /// Delete nodes. Stages take their task cards with them.
    Delete { target: Target },

    /// Connect two nodes.
    Connect {
        source: NodeId,
        target: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_handle: Option<HandleId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_handle: Option<HandleId>,
    },

    /// Remove an edge.
    Disconnect { edge_id: EdgeId },

    /// Set or clear an edge's style override.
    SetEdgeStyle {
        edge_id: EdgeId,
        style: Option<EdgeStyle>,
    },

    // === Sizes ===
    /// Resize a stage.
    ResizeStage { node_id: NodeId, size: Vec2 },

    /// Report the rendered size of a non-stage node.
    SetMeasuredSize { node_id: NodeId, size: Vec2 },

    // === Editing ===
    /// Open an edit session on a node field.
    BeginEdit {
        node_id: NodeId,
        #[serde(default)]
        field: EditField,
    },

    /// Replace the open session's draft.
    SetDraft { draft: String },

    /// Commit the draft and close the session.
    SaveEdit,

    /// Close the session without committing.
    CancelEdit,

    // === Canvas ===
    /// Pan the viewport by a screen-space delta.
    Pan { delta: Vec2 },

    /// Zoom the viewport.
    Zoom {
        factor: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        center: Option<Vec2>,
    },

    /// Reset viewport to default.
    ResetView,

    // === Batch ===
    /// Execute multiple commands in sequence.
    Batch { commands: Vec<Command> },
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command succeeded.
    Success {
        /// IDs of nodes created, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<NodeId>,
        /// IDs of nodes modified, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<NodeId>,
        /// IDs of nodes deleted, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<NodeId>,
        /// IDs of edges created, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created_edges: Vec<EdgeId>,
        /// IDs of edges deleted, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted_edges: Vec<EdgeId>,
    },
    /// Command failed.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
            created_edges: vec![],
            deleted_edges: vec![],
        }
    }

    pub fn created(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
            created_edges: vec![],
            deleted_edges: vec![],
        }
    }

    pub fn modified(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
            created_edges: vec![],
            deleted_edges: vec![],
        }
    }

    pub fn deleted(ids: Vec<NodeId>, edges: Vec<EdgeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
            created_edges: vec![],
            deleted_edges: edges,
        }
    }

    pub fn edge_created(id: EdgeId) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
            created_edges: vec![id],
            deleted_edges: vec![],
        }
    }

    pub fn edge_deleted(id: EdgeId) -> Self {
        Self::deleted(vec![], vec![id])
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_stage_serializes_with_type_field() {
        let cmd = Command::AddStage {
            label: "Intake".into(),
            position: Some(Vec2::new(100.0, 200.0)),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "add_stage");
        // Vec2 serializes as [x, y] array
        assert_eq!(json["position"], serde_json::json!([100.0, 200.0]));
    }

    #[test]
    fn add_stage_omits_none_position() {
        let cmd = Command::AddStage {
            label: String::new(),
            position: None,
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert!(json.get("position").is_none());
    }

    #[test]
    fn connect_deserializes_from_script_json() {
        let json = r#"{
            "type": "connect",
            "source": "cond-1",
            "target": "stage-2",
            "source_handle": "true"
        }"#;
        let cmd: Command = serde_json::from_str(json).unwrap();

        match cmd {
            Command::Connect {
                source,
                target,
                source_handle,
                target_handle,
            } => {
                assert_eq!(source, NodeId::from("cond-1"));
                assert_eq!(target, NodeId::from("stage-2"));
                assert_eq!(source_handle.as_deref(), Some("true"));
                assert!(target_handle.is_none());
            }
            _ => panic!("Expected Connect command"),
        }
    }

    #[test]
    fn begin_edit_defaults_to_label() {
        let cmd: Command =
            serde_json::from_str(r#"{"type": "begin_edit", "node_id": "n"}"#).unwrap();
        assert!(matches!(
            cmd,
            Command::BeginEdit {
                field: EditField::Label,
                ..
            }
        ));
    }

    #[test]
    fn batch_command_contains_nested_commands() {
        let cmd = Command::Batch {
            commands: vec![Command::CancelDrag, Command::SaveEdit],
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "batch");
        let commands = json["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0]["type"], "cancel_drag");
        assert_eq!(commands[1]["type"], "save_edit");
    }

    #[test]
    fn result_omits_empty_lists() {
        let json = serde_json::to_value(CommandResult::created(vec![NodeId::from("a")])).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success", "created": ["a"] }));
    }

    #[test]
    fn command_roundtrips_through_json() {
        let original = Command::SetEdgeStyle {
            edge_id: EdgeId::from("e1"),
            style: Some(EdgeStyle {
                stroke: Some("#e11d48".into()),
                stroke_width: Some(2.0),
                animated: true,
            }),
        };
        let json = serde_json::to_string(&original).unwrap();
        let restored: Command = serde_json::from_str(&json).unwrap();

        // Use JSON comparison since Command does not impl PartialEq
        let original_json = serde_json::to_value(&original).unwrap();
        let restored_json = serde_json::to_value(&restored).unwrap();
        assert_eq!(original_json, restored_json);
    }
}
