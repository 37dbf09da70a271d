//! Error types for pipeline invocations.
//!
//! Every variant is terminal for the current invocation: nothing is
//! retried locally, the error is surfaced to the invoking runtime and
//! its redelivery policy takes over.

use thiserror::Error;

use bucket_unzip_archive::ExtractError;
use bucket_unzip_storage::StorageError;

/// Errors that fail a pipeline invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Notification record list was empty.
    #[error("Notification contains no records")]
    EmptyNotification,

    /// Process configuration is missing or invalid.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Scratch directories could not be created.
    #[error("Scratch space unavailable at {path}: {message}")]
    ScratchUnavailable { path: String, message: String },

    /// Source archive could not be downloaded.
    #[error("Failed to fetch s3://{bucket}/{key}: {source}")]
    FetchFailed {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    /// Downloaded archive is corrupt or not a supported container.
    #[error("Unreadable archive: {source}")]
    ArchiveUnreadable {
        #[source]
        source: ExtractError,
    },

    /// An archive entry escapes the extraction directory.
    #[error("Traversal rejected: {source}")]
    TraversalRejected {
        #[source]
        source: ExtractError,
    },

    /// Local I/O failed while writing extracted content.
    #[error("Extraction I/O failure: {source}")]
    ExtractionIo {
        #[source]
        source: ExtractError,
    },

    /// Upload of an extracted file failed.
    #[error("Failed to upload to bucket {bucket}: {source}")]
    UploadFailed {
        bucket: String,
        #[source]
        source: StorageError,
    },
}

impl PipelineError {
    /// Name of the pipeline stage this error belongs to, for log context.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::EmptyNotification | PipelineError::InvalidConfig { .. } => "setup",
            PipelineError::ScratchUnavailable { .. } => "scratch",
            PipelineError::FetchFailed { .. } => "download",
            PipelineError::ArchiveUnreadable { .. }
            | PipelineError::TraversalRejected { .. }
            | PipelineError::ExtractionIo { .. } => "extract",
            PipelineError::UploadFailed { .. } => "upload",
        }
    }
}

impl From<ExtractError> for PipelineError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::ArchiveUnreadable { .. } => {
                PipelineError::ArchiveUnreadable { source: err }
            }
            ExtractError::TraversalRejected { .. } => {
                PipelineError::TraversalRejected { source: err }
            }
            ExtractError::IoError { .. } => PipelineError::ExtractionIo { source: err },
        }
    }
}
