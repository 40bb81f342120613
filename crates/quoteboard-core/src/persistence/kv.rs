//! Key-value storage backends.
//!
//! # Overview
//!
//! The board persists through the [`KeyValueStore`] capability, which
//! stands in for browser-style local/session storage: string keys mapping
//! to string values, read and written synchronously.
//!
//! Two implementations ship with the crate:
//!
//! - [`JsonFileStore`] - one JSON object per file, durable across restarts
//! - [`MemoryStore`] - lives as long as the process (session scope)
//!
//! # File Format
//!
//! ```json
//! {
//!   "quotes": "[{\"text\":\"...\",\"category\":\"Life\"}]",
//!   "lastSelectedCategory": "Life"
//! }
//! ```
//!
//! Values are stored as strings so the file mirrors the key-value contract
//! exactly; callers decide what a value means.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::PersistenceError;

/// String-keyed, string-valued storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Missing keys are `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

// ============================================================================
// MEMORY STORE
// ============================================================================

/// Process-lifetime store. Used for the session scope and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============================================================================
// JSON FILE STORE
// ============================================================================

/// Durable store backed by a single JSON file.
///
/// Every `set`/`remove` rewrites the whole file with write-then-rename so a
/// crash mid-write never leaves a truncated file behind. The mutex
/// serializes read-modify-write cycles within the process.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Store backed by `path`. The file (and its directory) is created on
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store backed by `<dir>/<scope>.json`.
    pub fn in_dir(dir: &Path, scope: &str) -> Self {
        Self::new(dir.join(format!("{scope}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);

        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&temp_path, format!("{json}\n"))?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    mod memory_store {
        use super::*;

        #[test]
        fn missing_key_is_none() {
            let store = MemoryStore::new();
            assert_eq!(store.get("nope").unwrap(), None);
        }

        #[test]
        fn set_then_get() {
            let store = MemoryStore::new();
            store.set("k", "v").unwrap();
            store.set("k", "v2").unwrap();
            assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        }

        #[test]
        fn remove_missing_is_ok() {
            let store = MemoryStore::new();
            store.remove("nope").unwrap();
            store.set("k", "v").unwrap();
            store.remove("k").unwrap();
            assert_eq!(store.get("k").unwrap(), None);
        }
    }

    mod json_file_store {
        use super::*;

        #[test]
        fn missing_file_reads_as_empty() {
            let dir = tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path(), "local");

            assert_eq!(store.get("quotes").unwrap(), None);
            assert!(!store.path().exists());
        }

        #[test]
        fn values_survive_a_new_instance() {
            let dir = tempdir().unwrap();

            JsonFileStore::in_dir(dir.path(), "local")
                .set("lastSelectedCategory", "Work")
                .unwrap();

            let reopened = JsonFileStore::in_dir(dir.path(), "local");
            assert_eq!(
                reopened.get("lastSelectedCategory").unwrap().as_deref(),
                Some("Work")
            );
        }

        #[test]
        fn creates_missing_directories() {
            let dir = tempdir().unwrap();
            let nested = dir.path().join("a").join("b");
            let store = JsonFileStore::in_dir(&nested, "local");

            store.set("k", "v").unwrap();

            assert!(nested.join("local.json").exists());
        }

        #[test]
        fn no_temp_file_left_behind() {
            let dir = tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path(), "local");

            store.set("k", "v").unwrap();

            assert!(!dir.path().join("local.json.tmp").exists());
        }

        #[test]
        fn keys_are_independent() {
            let dir = tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path(), "local");

            store.set("a", "1").unwrap();
            store.set("b", "2").unwrap();
            store.remove("a").unwrap();

            assert_eq!(store.get("a").unwrap(), None);
            assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
        }

        #[test]
        fn corrupt_file_is_an_error() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("local.json"), "{not json").unwrap();
            let store = JsonFileStore::in_dir(dir.path(), "local");

            assert!(matches!(store.get("k"), Err(PersistenceError::Json(_))));
        }
    }
}
