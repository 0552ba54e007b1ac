use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{StorageError, StorageProvider};

// ============================================================================
// File Storage - Local On-Device Persistence
// ============================================================================

/// One file per key under a base directory.
///
/// Writes go through a temp file followed by a rename so a crash mid-write
/// never leaves a truncated snapshot behind.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Map a storage key to a filename. Keys like "@CartMobile:cart" carry
    /// characters that are not portable across filesystems.
    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.base_dir.join(format!("{file_name}.json"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[async_trait]
impl StorageProvider for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir).await?;

        let target = self.path_for(key);
        let tmp = target.with_extension("json.tmp");

        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &target).await?;

        tracing::debug!(key = %key, path = %target.display(), bytes = value.len(), "Wrote storage slot");

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
