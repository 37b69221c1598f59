//! Storage ports for the persisted document.
//!
//! The store is written against the `StoragePort` trait so tests (and
//! ephemeral runs) can swap the filesystem for an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};

/// Keyed string storage. One key holds one whole serialized record;
/// writes replace the value atomically from the caller's point of view.
pub trait StoragePort: Send + Sync {
    /// Returns `Ok(None)` when the key has never been written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Filesystem-backed storage: one `<key>.json` file per key under a data
/// directory. The directory is created on first write.
#[derive(Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl StoragePort for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory: {}", self.data_dir.display())
        })?;
        let path = self.path(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// In-memory storage fake. Cloning shares the backing map, so two stores
/// over clones of one `MemoryStorage` see each other's writes.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StoragePort for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_storage() -> (FileStorage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().to_path_buf());
        (storage, temp_dir)
    }

    #[test]
    fn test_read_nonexistent_returns_none() {
        let (storage, _temp) = test_storage();
        assert!(storage.read("appData.v1").unwrap().is_none());
    }

    #[test]
    fn test_write_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let storage = FileStorage::new(nested.clone());

        storage.write("appData.v1", "{}").unwrap();

        assert!(nested.exists());
        assert_eq!(storage.read("appData.v1").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_write_read_roundtrip() {
        let (storage, _temp) = test_storage();
        storage.write("appData.v1", r#"{"onboardingComplete":true}"#).unwrap();
        assert_eq!(
            storage.read("appData.v1").unwrap().as_deref(),
            Some(r#"{"onboardingComplete":true}"#)
        );
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let (storage, _temp) = test_storage();
        storage.write("appData.v1", "one").unwrap();
        storage.write("appData.v1", "two").unwrap();
        assert_eq!(storage.read("appData.v1").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_remove_then_read_none() {
        let (storage, _temp) = test_storage();
        storage.write("appData.v1", "{}").unwrap();
        storage.remove("appData.v1").unwrap();
        assert!(storage.read("appData.v1").unwrap().is_none());
    }

    #[test]
    fn test_remove_nonexistent_is_ok() {
        let (storage, _temp) = test_storage();
        assert!(storage.remove("appData.v1").is_ok());
    }

    #[test]
    fn test_keys_do_not_collide() {
        let (storage, _temp) = test_storage();
        storage.write("appData.v1", "a").unwrap();
        storage.write("appData.v2", "b").unwrap();
        assert_eq!(storage.read("appData.v1").unwrap().as_deref(), Some("a"));
        assert_eq!(storage.read("appData.v2").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.write("appData.v1", "shared").unwrap();
        assert_eq!(b.read("appData.v1").unwrap().as_deref(), Some("shared"));

        b.remove("appData.v1").unwrap();
        assert!(a.read("appData.v1").unwrap().is_none());
    }
}
