//! Per-invocation run context.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bucket_unzip_common::{ARCHIVE_FILE_NAME, UNZIPPED_SUBDIR, ZIPPED_SUBDIR};

use crate::config::PipelineConfig;

/// Immutable value object created once per invocation.
///
/// Carries the notification's bucket/key, the destination bucket, and the
/// run-scoped scratch paths derived from a unique run identifier. The run
/// identifier namespaces every local path, so concurrent invocations on a
/// shared execution environment never touch each other's files.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Unique identifier for this run (nanosecond timestamp).
    pub run_id: String,
    /// Bucket the source archive was uploaded to.
    pub source_bucket: String,
    /// Key of the source archive (opaque).
    pub source_key: String,
    /// Bucket receiving the extracted files.
    pub destination_bucket: String,
    /// Run-scoped directory the archive is downloaded into.
    pub download_dir: PathBuf,
    /// Run-scoped directory the archive is extracted into.
    pub extract_dir: PathBuf,
    /// Full local path of the downloaded archive file.
    pub archive_path: PathBuf,
}

impl RunContext {
    /// Create a context with a fresh run identifier.
    ///
    /// # Arguments
    /// * `config` - Process configuration (destination bucket, scratch root)
    /// * `source_bucket` - Bucket from the notification
    /// * `source_key` - Key from the notification
    pub fn new(config: &PipelineConfig, source_bucket: &str, source_key: &str) -> Self {
        Self::with_run_id(config, source_bucket, source_key, fresh_run_id())
    }

    /// Create a context with an explicit run identifier.
    ///
    /// # Arguments
    /// * `config` - Process configuration
    /// * `source_bucket` - Bucket from the notification
    /// * `source_key` - Key from the notification
    /// * `run_id` - Identifier namespacing this run's scratch paths
    pub fn with_run_id(
        config: &PipelineConfig,
        source_bucket: &str,
        source_key: &str,
        run_id: impl Into<String>,
    ) -> Self {
        let run_id: String = run_id.into();
        let download_dir: PathBuf = config.artifact_root.join(ZIPPED_SUBDIR).join(&run_id);
        let extract_dir: PathBuf = config.artifact_root.join(UNZIPPED_SUBDIR).join(&run_id);
        let archive_path: PathBuf = download_dir.join(ARCHIVE_FILE_NAME);

        Self {
            run_id,
            source_bucket: source_bucket.to_string(),
            source_key: source_key.to_string(),
            destination_bucket: config.destination_bucket.clone(),
            download_dir,
            extract_dir,
            archive_path,
        }
    }
}

/// Nanosecond-resolution timestamp used as the run identifier.
fn fresh_run_id() -> String {
    let nanos: u128 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    nanos.to_string()
}
