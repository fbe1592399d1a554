//! Image store abstraction trait

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("not found")]
    NotFound(String),

    #[error("Invalid public id: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A processed image ready to be persisted
#[derive(Debug, Clone)]
pub struct StoreUpload {
    /// Namespace, e.g. `earnbuddy/profiles`
    pub folder: String,
    pub public_id: String,
    pub data: Bytes,
    pub content_type: String,
    /// File extension of `data`, without the dot
    pub extension: String,
    /// Server-side transformation the remote host applies on ingest
    pub transformation: Option<String>,
}

/// A remote object after a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    /// Identifier accepted by `ImageStore::destroy`
    pub public_id: String,
    pub secure_url: String,
    pub folder: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bytes: u64,
    pub format: String,
}

/// Persistence step of the upload pipeline.
///
/// Every call is awaited to completion by the caller; implementations never retry.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist one image and return the stored asset
    async fn upload(&self, upload: StoreUpload) -> StoreResult<StoredAsset>;

    /// Remove an asset by public id.
    ///
    /// Returns `StoreError::NotFound` when no asset has that id, so deleting the
    /// same id twice fails the second time.
    async fn destroy(&self, public_id: &str) -> StoreResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject ids that could escape a namespace
pub fn validate_public_id(public_id: &str) -> StoreResult<()> {
    if public_id.is_empty()
        || public_id.contains("..")
        || public_id.contains('\\')
        || public_id.starts_with('/')
        || public_id.ends_with('/')
    {
        return Err(StoreError::InvalidKey(public_id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_public_id() {
        assert!(validate_public_id("profile_1700000000000").is_ok());
        assert!(validate_public_id("earnbuddy/posts/post_1_abc").is_ok());
        assert!(validate_public_id("").is_err());
        assert!(validate_public_id("../etc/passwd").is_err());
        assert!(validate_public_id("/abs").is_err());
        assert!(validate_public_id("a\\b").is_err());
    }

    #[test]
    fn test_not_found_message_is_bare() {
        let err = StoreError::NotFound("profile_1".to_string());
        assert_eq!(err.to_string(), "not found");
    }
}
