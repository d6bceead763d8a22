use node::{NodeId, TaskPoolEntry};
use serde::{Deserialize, Serialize};

/// Tasks not yet placed on the canvas, in display order.
///
/// An id lives either here or on the canvas as a task card, never both.
/// [`TaskPool::take`] is the only way out and [`TaskPool::give_back`] the
/// only way back in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskPool {
    entries: Vec<TaskPoolEntry>,
}

impl TaskPool {
    /// Later duplicates of an id are dropped.
    pub fn new(entries: impl IntoIterator<Item = TaskPoolEntry>) -> Self {
        let mut pool = Self::default();
        for entry in entries {
            pool.give_back(entry);
        }
        pool
    }

    pub fn entries(&self) -> &[TaskPoolEntry] {
        &self.entries
    }

    pub fn get(&self, id: &NodeId) -> Option<&TaskPoolEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Remove an entry for placement.
    pub fn take(&mut self, id: &NodeId) -> Option<TaskPoolEntry> {
        let index = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Return an entry to the end of the pool. No-op if the id is already present.
    pub fn give_back(&mut self, entry: TaskPoolEntry) -> bool {
        if self.contains(&entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Drop every entry whose id satisfies `placed`.
    pub fn retain_unplaced(&mut self, placed: impl Fn(&NodeId) -> bool) {
        self.entries.retain(|e| !placed(&e.id));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
