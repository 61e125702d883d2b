//! Durable key/value storage for the glowbook client
//!
//! This module provides the string slot storage backing the session: an
//! in-memory store for tests and ephemeral use, and a file store that
//! survives process restarts.

use crate::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// String key/value slots.
///
/// `set_many` and `remove_many` apply all of their keys as one unit: a
/// concurrent reader sees either none or all of the change.
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store every `(key, value)` pair in one write
    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()>;

    /// Remove every key in one write. Missing keys are ignored.
    fn remove_many(&self, keys: &[&str]) -> StorageResult<()>;

    /// Get several values under one read, in the order of `keys`
    fn get_many(&self, keys: &[&str]) -> StorageResult<Vec<Option<String>>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Store a single value
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_many(&[(key, value)])
    }

    /// Remove a single key
    fn remove(&self, key: &str) -> StorageResult<()> {
        self.remove_many(&[key])
    }
}

/// In-memory slot storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let slots = self.slots.read().map_err(|_| StorageError::Poisoned)?;
        Ok(slots.get(key).cloned())
    }

    fn get_many(&self, keys: &[&str]) -> StorageResult<Vec<Option<String>>> {
        let slots = self.slots.read().map_err(|_| StorageError::Poisoned)?;
        Ok(keys.iter().map(|key| slots.get(*key).cloned()).collect())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        for (key, value) in entries {
            slots.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        let mut slots = self.slots.write().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            slots.remove(*key);
        }
        Ok(())
    }
}

/// File-backed slot storage.
///
/// The slots are kept as a single JSON object. Writes go to a sibling temp
/// file which is then renamed over the original.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl FileStore {
    /// Open (or lazily create) a store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Session storage file: {}", path.display());
        Self {
            path,
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<HashMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&self, slots: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, serde_json::to_vec_pretty(slots)?)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Persisted {} session slot(s)", slots.len());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.read().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn get_many(&self, keys: &[&str]) -> StorageResult<Vec<Option<String>>> {
        let _guard = self.lock.read().map_err(|_| StorageError::Poisoned)?;
        let mut slots = self.load()?;
        Ok(keys.iter().map(|key| slots.remove(*key)).collect())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
        let _guard = self.lock.write().map_err(|_| StorageError::Poisoned)?;
        let mut slots = self.load()?;
        for (key, value) in entries {
            slots.insert((*key).to_string(), (*value).to_string());
        }
        self.persist(&slots)
    }

    fn remove_many(&self, keys: &[&str]) -> StorageResult<()> {
        let _guard = self.lock.write().map_err(|_| StorageError::Poisoned)?;
        let mut slots = self.load()?;
        let before = slots.len();
        for key in keys {
            slots.remove(*key);
        }
        if slots.len() == before && !self.path.exists() {
            return Ok(());
        }
        self.persist(&slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() -> StorageResult<()> {
        let store = MemoryStore::new();

        store.set_many(&[("a", "1"), ("b", "2")])?;
        assert_eq!(store.get("a")?, Some("1".to_string()));
        assert_eq!(store.get("b")?, Some("2".to_string()));

        assert_eq!(
            store.get_many(&["b", "missing", "a"])?,
            vec![Some("2".to_string()), None, Some("1".to_string())]
        );

        store.remove_many(&["a", "b", "missing"])?;
        assert_eq!(store.get("a")?, None);
        assert_eq!(store.get("b")?, None);

        Ok(())
    }

    #[test]
    fn test_memory_store_clones_share_slots() -> StorageResult<()> {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("token", "abc")?;
        assert_eq!(other.get("token")?, Some("abc".to_string()));

        Ok(())
    }

    #[test]
    fn test_file_store_survives_reopen() -> StorageResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::new(&path);
        store.set_many(&[("auth_token", "abc"), ("user_role", "ADMIN")])?;

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("auth_token")?, Some("abc".to_string()));
        assert_eq!(reopened.get("user_role")?, Some("ADMIN".to_string()));

        reopened.remove("auth_token")?;
        assert_eq!(store.get("auth_token")?, None);
        assert_eq!(store.get("user_role")?, Some("ADMIN".to_string()));

        Ok(())
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() -> StorageResult<()> {
        let dir = tempfile::tempdir()?;
        let store = FileStore::new(dir.path().join("absent.json"));

        assert_eq!(store.get("auth_token")?, None);
        store.remove_many(&["auth_token"])?;
        assert!(!store.path().exists());

        Ok(())
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() -> StorageResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");
        fs::write(&path, b"not json")?;

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get("auth_token"),
            Err(StorageError::Serialization(_))
        ));

        Ok(())
    }
}
