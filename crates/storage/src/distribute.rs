//! Upload of an extracted directory tree to the destination bucket.

use std::path::Path;
use std::sync::Arc;

use bucket_unzip_common::to_posix_path;
use walkdir::WalkDir;

use crate::error::StorageError;
use crate::traits::StorageClient;

/// Walks a local directory tree and uploads every regular file found,
/// preserving the relative path as the destination key.
///
/// Uploads run sequentially in walk order; each one is independent and
/// idempotent (re-running overwrites with identical content). The first
/// failure aborts the remaining walk and already-uploaded objects are
/// left in place.
pub struct ObjectDistributor {
    client: Arc<dyn StorageClient>,
}

impl ObjectDistributor {
    /// Create a distributor over a storage client.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Upload every regular file under `source_dir` to `destination_bucket`.
    ///
    /// Keys are the files' paths relative to `source_dir`, with platform
    /// separators normalized to `/`. Directories produce no objects.
    ///
    /// # Arguments
    /// * `source_dir` - Root of the local tree to upload
    /// * `destination_bucket` - Destination bucket name
    ///
    /// # Returns
    /// The number of objects uploaded.
    ///
    /// # Errors
    /// Any walk error or any single file's upload error.
    pub async fn distribute(
        &self,
        source_dir: &Path,
        destination_bucket: &str,
    ) -> Result<u64, StorageError> {
        let mut uploaded: u64 = 0;

        // Sorted walk keeps failure reporting deterministic across runs
        for entry in WalkDir::new(source_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
        {
            let entry: walkdir::DirEntry = entry.map_err(|e| StorageError::IoError {
                path: e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                message: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path: &Path = entry.path();
            let relative: &Path =
                path.strip_prefix(source_dir)
                    .map_err(|e| StorageError::Other {
                        message: format!("{} not under {}: {}", path.display(), source_dir.display(), e),
                    })?;
            let key: String = to_posix_path(relative);

            self.client
                .put_object_from_file(destination_bucket, &key, path)
                .await?;

            uploaded += 1;
        }

        Ok(uploaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorageClient;
    use crate::traits::ObjectInfo;
    use std::fs;
    use tempfile::TempDir;

    fn populate(dir: &Path) {
        fs::create_dir_all(dir.join("docs/nested")).unwrap();
        fs::create_dir_all(dir.join("empty")).unwrap();
        fs::write(dir.join("top.txt"), b"top").unwrap();
        fs::write(dir.join("docs/readme.txt"), b"hello").unwrap();
        fs::write(dir.join("docs/nested/deep.txt"), b"deep").unwrap();
    }

    #[tokio::test]
    async fn test_distribute_uploads_relative_keys() {
        let dir: TempDir = TempDir::new().unwrap();
        populate(dir.path());

        let client: Arc<MemoryStorageClient> = Arc::new(MemoryStorageClient::new());
        let distributor: ObjectDistributor = ObjectDistributor::new(client.clone());

        let count: u64 = distributor.distribute(dir.path(), "dest").await.unwrap();
        assert_eq!(count, 3);

        assert_eq!(client.get_object("dest", "top.txt").await.unwrap(), b"top");
        assert_eq!(
            client.get_object("dest", "docs/readme.txt").await.unwrap(),
            b"hello"
        );
        assert_eq!(
            client
                .get_object("dest", "docs/nested/deep.txt")
                .await
                .unwrap(),
            b"deep"
        );

        // Directories themselves produce no objects
        let objects: Vec<ObjectInfo> = client.list_objects("dest", "").await.unwrap();
        assert_eq!(objects.len(), 3);
        assert!(objects.iter().all(|o| !o.key.starts_with("empty")));
    }

    #[tokio::test]
    async fn test_distribute_is_idempotent() {
        let dir: TempDir = TempDir::new().unwrap();
        populate(dir.path());

        let client: Arc<MemoryStorageClient> = Arc::new(MemoryStorageClient::new());
        let distributor: ObjectDistributor = ObjectDistributor::new(client.clone());

        distributor.distribute(dir.path(), "dest").await.unwrap();
        distributor.distribute(dir.path(), "dest").await.unwrap();

        let objects: Vec<ObjectInfo> = client.list_objects("dest", "").await.unwrap();
        assert_eq!(objects.len(), 3);
        assert_eq!(
            client.get_object("dest", "docs/readme.txt").await.unwrap(),
            b"hello"
        );
    }

    #[tokio::test]
    async fn test_distribute_aborts_on_first_failure() {
        let dir: TempDir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("c.txt"), b"c").unwrap();

        let client: Arc<MemoryStorageClient> = Arc::new(MemoryStorageClient::new());
        client.deny_put("b.txt");
        let distributor: ObjectDistributor = ObjectDistributor::new(client.clone());

        let err: StorageError = distributor.distribute(dir.path(), "dest").await.unwrap_err();
        assert!(matches!(err, StorageError::AccessDenied { .. }));

        // Sorted walk: a uploaded, b denied, c never tried
        let objects: Vec<ObjectInfo> = client.list_objects("dest", "").await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].key, "a.txt");
    }

    #[tokio::test]
    async fn test_distribute_empty_directory() {
        let dir: TempDir = TempDir::new().unwrap();

        let client: Arc<MemoryStorageClient> = Arc::new(MemoryStorageClient::new());
        let distributor: ObjectDistributor = ObjectDistributor::new(client.clone());

        let count: u64 = distributor.distribute(dir.path(), "dest").await.unwrap();
        assert_eq!(count, 0);
        assert!(client.list_objects("dest", "").await.unwrap().is_empty());
    }
}
