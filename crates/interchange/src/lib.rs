//! Waypoint Interchange Format
//!
//! Versioned JSON persistence for the workflow graph. Pure data: callbacks
//! and other presentation concerns never enter the document.
//!
//! # Document Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "nodes": [
//!     { "id": "s1", "kind": "stage", "position": {"x": 100, "y": 100},
//!       "size": {"width": 220, "height": 140}, "label": "Intake", "displayNumber": 1 },
//!     { "id": "t1", "kind": "taskCard", "position": {"x": 50, "y": 50},
//!       "size": {"width": 150, "height": 60}, "parentId": "s1",
//!       "label": "Verify invoice", "department": "Finance" }
//!   ],
//!   "edges": [
//!     { "id": "e1", "sourceNodeId": "t1", "targetNodeId": "s1" }
//!   ]
//! }
//! ```
//!
//! Documents live in a single [`Slot`] under a fixed key. [`Persistence`]
//! is the only writer.

mod document;
mod persistence;
mod slot;

pub use document::{Document, EdgeRecord, NodeRecord, PointRecord, SizeRecord};
pub use persistence::Persistence;
pub use slot::{FileSlot, MemorySlot, Slot};

use thiserror::Error;

pub const FORMAT_VERSION: u32 = 1;

/// Slot key used when the host does not pick one.
pub const DEFAULT_STORAGE_KEY: &str = "workflow-builder";

/// Failure to read or write a storage slot.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("I/O error on slot '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid slot key '{0}'")]
    InvalidKey(String),
}

/// Failure to persist or restore a document.
///
/// These never reach the editing flow: loading maps them to "no saved
/// state" and saving logs them.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error("failed to parse document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported document version {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u32),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}
