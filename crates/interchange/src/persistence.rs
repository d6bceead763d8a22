use crate::{Document, MemorySlot, PersistError, Slot, DEFAULT_STORAGE_KEY};
use graph::{GraphSnapshot, GraphStore};
use node::{CanvasSize, NodeKindTag};

/// Saves and restores the graph document under a single slot key.
pub struct Persistence {
    slot: Box<dyn Slot>,
    key: String,
}

impl Persistence {
    pub fn new(slot: Box<dyn Slot>, key: impl Into<String>) -> Self {
        Self {
            slot,
            key: key.into(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySlot::new()), DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn slot(&self) -> &dyn Slot {
        self.slot.as_ref()
    }

    /// Serialize the snapshot and replace the slot contents.
    pub fn save(&self, snapshot: &GraphSnapshot) -> Result<(), PersistError> {
        let json = Document::from_snapshot(snapshot).to_json()?;
        self.slot.write(&self.key, &json)?;
        log::debug!(
            "Saved {} node(s) and {} edge(s) to '{}'",
            snapshot.nodes.len(),
            snapshot.edges.len(),
            self.key
        );
        Ok(())
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn try_load(
        &self,
        intrinsic: &dyn Fn(NodeKindTag) -> CanvasSize,
    ) -> Result<Option<GraphStore>, PersistError> {
        let Some(json) = self.slot.read(&self.key)? else {
            return Ok(None);
        };
        let store = Document::from_json(&json)?.into_store(intrinsic)?;
        Ok(Some(store))
    }

    /// Like [`Persistence::try_load`], but anything unreadable counts as
    /// "no saved state".
    pub fn load(&self, intrinsic: &dyn Fn(NodeKindTag) -> CanvasSize) -> Option<GraphStore> {
        match self.try_load(intrinsic) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("Ignoring saved workflow in '{}': {}", self.key, e);
                None
            }
        }
    }

    pub fn clear(&self) -> Result<(), PersistError> {
        self.slot.remove(&self.key)?;
        Ok(())
    }
}
