//! Storage traits/interfaces for object storage operations.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StorageError;

/// Information about a stored object from list operations.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Low-level object storage operations - implemented by each backend.
///
/// Authentication and region selection belong to the implementation; the
/// pipeline only names buckets and keys.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Download an object to bytes.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Download an object to a local file, creating or truncating it.
    async fn get_object_to_file(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> Result<(), StorageError>;

    /// Upload bytes as an object.
    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Upload a local file's full contents as an object.
    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> Result<(), StorageError>;

    /// List objects under a key prefix.
    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, StorageError>;
}
