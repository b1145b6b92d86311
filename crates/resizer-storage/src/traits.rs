//! Blob store abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Whether the same call may succeed on a later attempt. Key and
    /// configuration errors are deterministic.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            StorageError::InvalidKey(_) | StorageError::ConfigError(_) | StorageError::NotFound(_)
        )
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key-addressable object store
///
/// `put` must be idempotent: writing the same key twice overwrites the
/// previous object. Variant stores are retried, and resubmitted requests
/// rewrite the same keys.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` under `key`, replacing any existing object.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Read an object back by key.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
