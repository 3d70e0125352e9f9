//! Local storage layer
//!
//! A string key/value store standing in for the browser's local storage.
//! `InMemoryStorage` for tests and demos, `FileStorage` keeps a JSON object
//! on disk so a session survives restarts.

use crate::error::KeuanganError;
use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Trait for key/value persistence
#[async_trait::async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>>;
    async fn set_item(&self, key: &str, value: String) -> Result<()>;
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-memory storage for development
pub struct InMemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LocalStorage for InMemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().await;
        items.remove(key);
        Ok(())
    }
}

/// JSON-file storage. The whole object is rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let items = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!(
                        "Storage file {} is corrupt, starting empty: {}",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(KeuanganError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        debug!("Opened storage at {} ({} keys)", path.display(), items.len());

        Ok(Self {
            path,
            items: Arc::new(RwLock::new(items)),
        })
    }

    async fn flush(&self, items: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(items)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl LocalStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value);
        self.flush(&items).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.write().await;
        if items.remove(key).is_some() {
            self.flush(&items).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let storage = InMemoryStorage::new();
        storage.set_item("k", "v".to_string()).await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap(), Some("v".to_string()));

        storage.remove_item("k").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let storage = FileStorage::open(&path).await.unwrap();
            storage
                .set_item("keuanganku-user", "{\"id\":\"1\"}".to_string())
                .await
                .unwrap();
        }

        let reopened = FileStorage::open(&path).await.unwrap();
        assert_eq!(
            reopened.get_item("keuanganku-user").await.unwrap(),
            Some("{\"id\":\"1\"}".to_string())
        );

        reopened.remove_item("keuanganku-user").await.unwrap();
        let again = FileStorage::open(&path).await.unwrap();
        assert_eq!(again.get_item("keuanganku-user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        let storage = FileStorage::open(&path).await.unwrap();
        assert_eq!(storage.get_item("anything").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set_item("k", "v".to_string()).await.unwrap();
        assert!(path.exists());
    }
}
