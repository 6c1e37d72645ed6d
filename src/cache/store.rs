// Key-value storage for persisted UI state.
// Handles atomic file writes and an in-memory backend for tests.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{DashError, Result};

use super::paths::{cache_dir, key_path};

/// Persistence port for small string records.
pub trait KeyValueStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// One file per key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage rooted at the platform cache directory.
    pub fn in_cache_dir() -> Result<Self> {
        cache_dir()
            .map(Self::new)
            .ok_or_else(|| DashError::Other("No cache directory available".to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl KeyValueStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = key_path(&self.root, key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        Ok(Some(contents))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = key_path(&self.root, key);
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

/// Volatile storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| DashError::Other("storage lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| DashError::Other("storage lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        storage.save("github-org-dashboard/ui-state", r#"{"page":2}"#).unwrap();
        let loaded = storage.load("github-org-dashboard/ui-state").unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"page":2}"#));

        // No temp file left behind.
        let leftovers: Vec<_> = fs::read_dir(storage.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_file_storage_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        assert!(storage.load("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_memory_storage_overwrites() {
        let storage = MemoryStorage::new();
        storage.save("k", "a").unwrap();
        storage.save("k", "b").unwrap();
        assert_eq!(storage.load("k").unwrap().as_deref(), Some("b"));
    }
}
