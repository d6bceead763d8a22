use crate::SlotError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A keyed string store the document is written to.
///
/// Writes replace the whole value; readers never observe a partial write.
pub trait Slot: Send {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;
    fn write(&self, key: &str, value: &str) -> Result<(), SlotError>;
    fn remove(&self, key: &str) -> Result<(), SlotError>;
}

/// Process-local slot, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySlot {
    values: RefCell<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per slot inside a directory.
///
/// Writes go to a temporary sibling first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, SlotError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(SlotError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str) -> impl FnOnce(io::Error) -> SlotError + '_ {
    move |source| SlotError::Io {
        key: key.to_string(),
        source,
    }
}

fn write_then_rename(temp: &Path, path: &Path, value: &str) -> io::Result<()> {
    let mut file = fs::File::create(temp)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, path)
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(io_error(key))?;

        let temp = path.with_extension("json.tmp");
        if let Err(e) = write_then_rename(&temp, &path, value) {
            // Never leave a half-written sibling behind
            let _ = fs::remove_file(&temp);
            return Err(io_error(key)(e));
        }
        log::trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_slot() {
        let slot = MemorySlot::new();
        assert_eq!(slot.read("k").unwrap(), None);
        slot.write("k", "one").unwrap();
        slot.write("k", "two").unwrap();
        assert_eq!(slot.read("k").unwrap().as_deref(), Some("two"));
        slot.remove("k").unwrap();
        assert_eq!(slot.read("k").unwrap(), None);
    }

    #[test]
    fn test_file_slot_round_trip() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("nested"));

        assert_eq!(slot.read("workflow-builder").unwrap(), None);
        slot.write("workflow-builder", "{}").unwrap();
        assert_eq!(slot.read("workflow-builder").unwrap().as_deref(), Some("{}"));
        assert!(dir.path().join("nested/workflow-builder.json").exists());
        assert!(!dir.path().join("nested/workflow-builder.json.tmp").exists());

        slot.remove("workflow-builder").unwrap();
        slot.remove("workflow-builder").unwrap();
        assert_eq!(slot.read("workflow-builder").unwrap(), None);
    }

    #[test]
    fn test_failed_file_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory where the file should go makes the rename fail
        fs::create_dir_all(dir.path().join("k.json/occupied")).unwrap();
        let slot = FileSlot::new(dir.path());

        assert!(matches!(slot.write("k", "{}"), Err(SlotError::Io { .. })));
        assert!(!dir.path().join("k.json.tmp").exists());
        assert!(dir.path().join("k.json").is_dir());
    }

    #[test]
    fn test_file_slot_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path());
        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(slot.write(key, "x"), Err(SlotError::InvalidKey(_))), "{key}");
        }
    }
}
