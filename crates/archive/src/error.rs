//! Error types for archive extraction.

use thiserror::Error;

/// Errors that can occur while extracting an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Archive cannot be opened or its index cannot be read.
    #[error("Unreadable archive {path}: {message}")]
    ArchiveUnreadable {
        /// Path of the archive file.
        path: String,
        /// Underlying container error.
        message: String,
    },

    /// Entry path resolves outside the extraction root.
    #[error("Entry escapes extraction root: {entry}")]
    TraversalRejected {
        /// The offending entry name as stored in the archive.
        entry: String,
    },

    /// Local I/O error while writing extracted content.
    #[error("I/O error at {path}: {message}")]
    IoError {
        /// Path where the error occurred.
        path: String,
        /// Error message.
        message: String,
    },
}

impl ExtractError {
    /// Create an IoError from std::io::Error.
    ///
    /// # Arguments
    /// * `path` - Path where the error occurred
    /// * `err` - The underlying IO error
    pub fn from_io(path: impl Into<String>, err: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
