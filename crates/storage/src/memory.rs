//! In-memory `StorageClient` implementation used in tests.
//!
//! Backs the end-to-end pipeline tests without touching a real backend.
//! Supports per-key put denial to simulate permission failures mid-batch.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::traits::{ObjectInfo, StorageClient};

/// A `StorageClient` holding all objects in process memory.
#[derive(Default)]
pub struct MemoryStorageClient {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    denied_put_keys: Mutex<HashSet<String>>,
}

impl MemoryStorageClient {
    /// Create an empty in-memory client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent puts of `key` fail with `AccessDenied`, in any bucket.
    pub fn deny_put(&self, key: &str) {
        self.denied_put_keys
            .lock()
            .unwrap()
            .insert(key.to_string());
    }

    /// Number of objects currently stored in `bucket`.
    pub fn object_count(&self, bucket: &str) -> usize {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .count()
    }

    fn check_put_allowed(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        if self.denied_put_keys.lock().unwrap().contains(key) {
            return Err(StorageError::AccessDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "put denied by test configuration".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StorageClient for MemoryStorageClient {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn get_object_to_file(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> Result<(), StorageError> {
        let data: Vec<u8> = self.get_object(bucket, key).await?;

        tokio::fs::write(file_path, data)
            .await
            .map_err(|e| StorageError::from_io(file_path.display().to_string(), e))
    }

    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.check_put_allowed(bucket, key)?;

        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data.to_vec());
        Ok(())
    }

    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> Result<(), StorageError> {
        self.check_put_allowed(bucket, key)?;

        let data: Vec<u8> = tokio::fs::read(file_path)
            .await
            .map_err(|e| StorageError::from_io(file_path.display().to_string(), e))?;

        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), data);
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, StorageError> {
        let mut objects: Vec<ObjectInfo> = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), data)| ObjectInfo {
                key: k.clone(),
                size: data.len() as u64,
            })
            .collect();

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}
