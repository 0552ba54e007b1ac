use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::{StorageError, StorageProvider};

// ============================================================================
// Memory Storage - In-Process Key-Value Map
// ============================================================================

/// Volatile in-process storage. Loses everything on restart, which makes it
/// useful for tests and as a fallback when no durable backend is configured.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail. Lets tests exercise the persistence
    /// error path without a real broken disk.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("injected write failure".to_string()));
        }

        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let storage = MemoryStorage::new();

        assert!(storage.get("k").await.unwrap().is_none());

        storage.set("k", "v").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("v"));

        storage.remove("k").await.unwrap();
        assert!(storage.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);

        let err = storage.set("k", "v").await.unwrap_err();

        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(storage.get("k").await.unwrap().is_none());
    }
}
