//! In-memory preference storage.

use super::{BoxFuture, PreferenceStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStorage {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            let values = self
                .values
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(values.get(&key).cloned())
        })
    }

    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let value = value.to_string();
        Box::pin(async move {
            let mut values = self
                .values
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            values.insert(key, value);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut values = self
                .values
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            values.remove(&key);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_set_and_get() {
        let storage = MemoryStorage::new();
        block_on(storage.set("theme", "dark")).unwrap();
        assert_eq!(block_on(storage.get("theme")).unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_missing_key() {
        let storage = MemoryStorage::new();
        assert_eq!(block_on(storage.get("nonexistent")).unwrap(), None);
    }

    #[test]
    fn test_overwrite_and_remove() {
        let storage = MemoryStorage::new();
        block_on(storage.set("k", "1")).unwrap();
        block_on(storage.set("k", "2")).unwrap();
        assert_eq!(block_on(storage.get("k")).unwrap(), Some("2".to_string()));

        block_on(storage.remove("k")).unwrap();
        block_on(storage.remove("k")).unwrap();
        assert_eq!(block_on(storage.get("k")).unwrap(), None);
    }
}
