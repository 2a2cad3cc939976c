//! Object-storage seam.
//!
//! The service layer never talks to a concrete store; it goes through
//! [`ObjectStorage`] so deployments can plug in S3-compatible storage and
//! tests can use an in-memory double.

use std::time::Duration;

use async_trait::async_trait;

/// Failures from the object store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Binary object storage for listing media.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `path` and return the canonical object URL.
    async fn upload(
        &self,
        bytes: &[u8],
        content_type: &str,
        path: &str,
    ) -> Result<String, StorageError>;

    /// Remove the object behind `url`. Returns `false` when it was
    /// already gone.
    async fn delete(&self, url: &str) -> Result<bool, StorageError>;

    /// A time-limited read URL for the object.
    async fn read_url(&self, url: &str, ttl: Duration) -> Result<String, StorageError>;

    /// Fetch the object's bytes.
    async fn download(&self, url: &str) -> Result<Vec<u8>, StorageError>;
}
