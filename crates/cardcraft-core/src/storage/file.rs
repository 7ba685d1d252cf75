//! File-based preference storage for native platforms.

use super::{BoxFuture, PreferenceStore, StorageError, StorageResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File name used inside the storage directory.
const PREFERENCES_FILE: &str = "preferences.json";

/// File-based storage.
///
/// Keeps every key in a single JSON object file.
#[derive(Debug)]
pub struct FileStorage {
    /// Path of the JSON file.
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl FileStorage {
    /// Create a file storage in the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self {
            path: base_path.join(PREFERENCES_FILE),
            lock: Mutex::new(()),
        })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/cardcraft/`
    /// On Windows: `%LOCALAPPDATA%\cardcraft\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("cardcraft"))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json = fs::read_to_string(&self.path).map_err(|e| {
            StorageError::Io(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&json).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(values)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    fn modify(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> StorageResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let mut values = self.read_all()?;
        f(&mut values);
        self.write_all(&values)
    }
}

impl PreferenceStore for FileStorage {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            let _guard = self
                .lock
                .lock()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(self.read_all()?.remove(&key))
        })
    }

    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let value = value.to_string();
        Box::pin(async move {
            self.modify(|values| {
                values.insert(key, value);
            })
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            self.modify(|values| {
                values.remove(&key);
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;
    use tempfile::TempDir;

    #[test]
    fn test_persists_across_instances() {
        let dir = TempDir::new().unwrap();

        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.set("introCarouselViewed", "true")).unwrap();
        drop(storage);

        let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(
            block_on(reopened.get("introCarouselViewed")).unwrap(),
            Some("true".to_string())
        );
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested")).unwrap();
        assert!(dir.path().join("nested").exists());
        assert_eq!(block_on(storage.get("anything")).unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        block_on(storage.set("a", "1")).unwrap();
        block_on(storage.set("b", "2")).unwrap();
        block_on(storage.remove("a")).unwrap();

        assert_eq!(block_on(storage.get("a")).unwrap(), None);
        assert_eq!(block_on(storage.get("b")).unwrap(), Some("2".to_string()));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        fs::write(storage.path(), "{not json").unwrap();

        let result = block_on(storage.get("a"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
