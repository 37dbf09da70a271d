//! Download of the source archive into scratch space.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::StorageError;
use crate::traits::StorageClient;

/// Downloads one named object from a source bucket to a local file.
///
/// The destination's parent directory must already exist; scratch
/// preparation guarantees that for pipeline runs.
pub struct ObjectFetcher {
    client: Arc<dyn StorageClient>,
}

impl ObjectFetcher {
    /// Create a fetcher over a storage client.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    /// Stream the object body to `destination`, creating or truncating it.
    ///
    /// # Arguments
    /// * `bucket` - Source bucket name
    /// * `key` - Source object key (opaque identifier)
    /// * `destination` - Local file path to write
    ///
    /// # Returns
    /// The local path of the downloaded file.
    ///
    /// # Errors
    /// Any transport, missing-object, or local-write error. No retry is
    /// performed at this layer.
    pub async fn fetch(
        &self,
        bucket: &str,
        key: &str,
        destination: &Path,
    ) -> Result<PathBuf, StorageError> {
        self.client
            .get_object_to_file(bucket, key, destination)
            .await?;

        Ok(destination.to_path_buf())
    }
}
