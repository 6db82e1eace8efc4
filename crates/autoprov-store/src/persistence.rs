//! Key-value persistence for serialized drafts.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::StoreError;

/// Persisted storage holding one serialized draft per key.
pub trait DraftPersistence {
    /// The stored text for `key`, or `None` when nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Clearing an absent key is not an error.
    fn clear(&self, key: &str) -> Result<(), StoreError>;
}

impl<P: DraftPersistence + ?Sized> DraftPersistence for &P {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value)
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        (**self).clear(key)
    }
}

/// In-process storage. Contents are lost when the value is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether anything is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }
}

fn poisoned() -> StoreError {
    StoreError::Other("memory store lock poisoned".into())
}

impl DraftPersistence for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

/// File-backed storage: each key is a `<key>.json` file under one directory.
///
/// The directory is created on first save, so opening a store never fails.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DraftPersistence for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!(path = %path.display(), bytes = value.len(), "saved draft");
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load("k").unwrap(), None);
        store.save("k", "{}").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("{}"));
        store.clear("k").unwrap();
        assert!(!store.contains("k"));
        store.clear("k").unwrap();
    }

    #[test]
    fn file_store_creates_directory_on_save() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path().join("nested").join("drafts"));
        assert_eq!(store.load("autoprov_pdi_draft").unwrap(), None);

        store.save("autoprov_pdi_draft", r#"{"a":1}"#).unwrap();
        assert!(store.path_for("autoprov_pdi_draft").exists());
        assert_eq!(
            store.load("autoprov_pdi_draft").unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path());
        store.save("k", "x").unwrap();
        store.clear("k").unwrap();
        store.clear("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }

    #[test]
    fn concurrent_stores_on_one_directory_leave_only_whole_drafts() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_path_buf();
        let writers: Vec<_> = (0..4)
            .map(|n| {
                let store = FileStore::open(&dir);
                std::thread::spawn(move || {
                    let body = format!("{{\"writer\":{n},\"pad\":\"{}\"}}", "x".repeat(4096));
                    for _ in 0..25 {
                        store.save("autoprov_dispute_draft", &body).unwrap();
                    }
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }

        let store = FileStore::open(&dir);
        let text = store.load("autoprov_dispute_draft").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["pad"].as_str().map(str::len), Some(4096));

        let names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["autoprov_dispute_draft.json"]);
    }

    #[test]
    fn file_store_keys_are_independent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::open(tmp.path());
        store.save("autoprov_dss_draft", "dss").unwrap();
        store.save("autoprov_dispute_draft", "drb").unwrap();
        store.clear("autoprov_dss_draft").unwrap();
        assert_eq!(store.load("autoprov_dispute_draft").unwrap().as_deref(), Some("drb"));
    }
}
