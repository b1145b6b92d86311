//! In-memory blob store, used by tests and by `STORAGE_BACKEND=memory`.

use crate::keys::validate_key;
use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A stored object together with the content type it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        let objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        objects.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        validate_key(key)?;
        let mut objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.object(key)
            .map(|o| o.data)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let storage = MemoryStorage::new();
        storage
            .put("a/b.webp", Bytes::from_static(b"data"), "image/webp")
            .await
            .unwrap();

        assert_eq!(storage.get("a/b.webp").await.unwrap(), Bytes::from_static(b"data"));
        assert_eq!(storage.object("a/b.webp").unwrap().content_type, "image/webp");
        assert_eq!(storage.keys(), vec!["a/b.webp".to_string()]);
    }

    #[tokio::test]
    async fn test_clones_share_objects() {
        let storage = MemoryStorage::new();
        let clone = storage.clone();
        clone.put("x.png", Bytes::new(), "image/png").await.unwrap();
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let storage = MemoryStorage::new();
        assert!(storage.put("", Bytes::new(), "image/png").await.is_err());
        assert!(storage.is_empty());
    }
}
