//! Filesystem storage handler
//!
//! One file per key under the configured data directory. Writes go to a
//! temporary sibling first and are renamed into place.

use async_trait::async_trait;
use solsocial_core::effects::StorageEffects;
use solsocial_core::SocialError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Storage handler backed by plain files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a handler rooted at `base_path`. The directory is created lazily.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Root directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn validate_key(key: &str) -> Result<(), SocialError> {
        if key.is_empty() {
            return Err(SocialError::storage("Key cannot be empty"));
        }
        if key.len() > 200 {
            return Err(SocialError::storage("Key too long (max 200 characters)"));
        }
        if key.contains("..")
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(SocialError::storage(format!(
                "Key contains invalid characters: {key}"
            )));
        }
        Ok(())
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }
}

#[async_trait]
impl StorageEffects for FileStorage {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, SocialError> {
        Self::validate_key(key)?;
        match fs::read(self.key_to_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SocialError::storage(format!("Failed to read {key}: {e}"))),
        }
    }

    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), SocialError> {
        Self::validate_key(key)?;
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            SocialError::storage(format!(
                "Failed to create {}: {e}",
                self.base_path.display()
            ))
        })?;

        let path = self.key_to_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &value)
            .await
            .map_err(|e| SocialError::storage(format!("Failed to write {key}: {e}")))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| SocialError::storage(format!("Failed to commit {key}: {e}")))?;

        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SocialError> {
        Self::validate_key(key)?;
        match fs::remove_file(self.key_to_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SocialError::storage(format!("Failed to remove {key}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_load_remove() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.load("notifications.list").await.unwrap(), None);
        storage
            .store("notifications.list", b"[1,2]".to_vec())
            .await
            .unwrap();
        assert_eq!(
            storage.load("notifications.list").await.unwrap(),
            Some(b"[1,2]".to_vec())
        );
        assert!(dir.path().join("nested/notifications.list.json").exists());
        assert!(!dir.path().join("nested/notifications.list.json.tmp").exists());

        storage.remove("notifications.list").await.unwrap();
        storage.remove("notifications.list").await.unwrap();
        assert_eq!(storage.load("notifications.list").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.store("k", b"first".to_vec()).await.unwrap();
        storage.store("k", b"second".to_vec()).await.unwrap();
        assert_eq!(storage.load("k").await.unwrap(), Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path());
        for key in ["", "../escape", "a/b", "with space"] {
            assert!(matches!(
                storage.store(key, Vec::new()).await,
                Err(SocialError::Storage { .. })
            ));
        }
    }
}
