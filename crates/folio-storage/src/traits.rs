//! Storage backends
//!
//! Object storage for uploads: presigned PUTs and deletes by key.

use async_trait::async_trait;
use folio_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// The server never proxies file bytes through storage itself: it hands out presigned PUT
/// URLs and removes objects by key. Keys never start with `/`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Generate a presigned PUT URL for a direct upload to `storage_key`.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Delete a file by its storage key
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Delete several files. Every key is attempted; the first error is returned.
    async fn delete_many(&self, storage_keys: &[String]) -> StorageResult<()> {
        let results =
            futures::future::join_all(storage_keys.iter().map(|key| self.delete(key))).await;
        results.into_iter().collect()
    }
}
