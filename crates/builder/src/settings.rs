//! Builder configuration.
//!
//! Every field has a default, so a settings file only needs the keys it
//! wants to override. Sizes and points are written as `[x, y]` pairs.

use interchange::DEFAULT_STORAGE_KEY;
use node::{CanvasDelta, CanvasPoint, CanvasSize, NodeKindTag, TaskPoolEntry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Size a node takes before the host reports a measured one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntrinsicSizes {
    pub task_card: CanvasSize,
    pub conditional: CanvasSize,
    pub error_handler: CanvasSize,
    /// Initial size for new stages. Stages keep an explicit size afterwards.
    pub stage: CanvasSize,
}

impl Default for IntrinsicSizes {
    fn default() -> Self {
        Self {
            task_card: CanvasSize::new(150.0, 60.0),
            conditional: CanvasSize::new(140.0, 80.0),
            error_handler: CanvasSize::new(180.0, 70.0),
            stage: CanvasSize::new(220.0, 140.0),
        }
    }
}

impl IntrinsicSizes {
    pub fn for_kind(&self, kind: NodeKindTag) -> CanvasSize {
        match kind {
            NodeKindTag::Stage => self.stage,
            NodeKindTag::TaskCard => self.task_card,
            NodeKindTag::Conditional => self.conditional,
            NodeKindTag::ErrorHandler => self.error_handler,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Slot key the workflow document is saved under.
    pub storage_key: String,
    pub sizes: IntrinsicSizes,
    /// Where the first toolbar-created node appears.
    pub spawn_origin: CanvasPoint,
    /// Offset between consecutive toolbar-created nodes so they don't stack.
    pub spawn_offset: CanvasDelta,
    /// Number of spawns before the cascade wraps back to the origin.
    pub spawn_wrap: u32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Tasks available for placement when nothing has been saved yet.
    pub task_pool: Vec<TaskPoolEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            sizes: IntrinsicSizes::default(),
            spawn_origin: CanvasPoint::new(80.0, 320.0),
            spawn_offset: CanvasDelta::new(30.0, 30.0),
            spawn_wrap: 8,
            min_zoom: 0.1,
            max_zoom: 10.0,
            task_pool: default_task_pool(),
        }
    }
}

impl Settings {
    pub fn from_json(input: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(input)?;
        Ok(settings.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Self::from_json(&contents)
    }

    pub fn intrinsic_size(&self, kind: NodeKindTag) -> CanvasSize {
        self.sizes.for_kind(kind)
    }

    /// Swap inverted or non-positive zoom limits for the defaults.
    fn normalized(mut self) -> Self {
        let valid = self.min_zoom.is_finite()
            && self.max_zoom.is_finite()
            && self.min_zoom > 0.0
            && self.min_zoom <= self.max_zoom;
        if !valid {
            log::warn!(
                "Ignoring zoom limits {}..{}, using defaults",
                self.min_zoom,
                self.max_zoom
            );
            let defaults = Self::default();
            self.min_zoom = defaults.min_zoom;
            self.max_zoom = defaults.max_zoom;
        }
        self
    }
}

fn default_task_pool() -> Vec<TaskPoolEntry> {
    vec![
        TaskPoolEntry::new("task-verify-invoice", "Verify invoice", "Finance"),
        TaskPoolEntry::new("task-approve-budget", "Approve budget", "Finance"),
        TaskPoolEntry::new("task-provision-account", "Provision account", "IT"),
        TaskPoolEntry::new("task-background-check", "Background check", "HR"),
        TaskPoolEntry::new("task-ship-order", "Ship order", "Logistics"),
    ]
}
