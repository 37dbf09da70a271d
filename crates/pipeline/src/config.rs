//! Process-wide pipeline configuration.
//!
//! Built once at process entry and passed by reference into the
//! orchestrator; immutable thereafter.

use std::path::PathBuf;

use bucket_unzip_common::{ARTIFACT_ROOT, DEST_BUCKET_ENV_VAR};

use crate::error::PipelineError;

/// Configuration read once at process start.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bucket that receives the extracted files.
    pub destination_bucket: String,
    /// Root of the local scratch tree.
    pub artifact_root: PathBuf,
}

impl PipelineConfig {
    /// Build a configuration with the default artifact root.
    ///
    /// # Arguments
    /// * `destination_bucket` - Bucket receiving extracted files
    pub fn new(destination_bucket: impl Into<String>) -> Self {
        Self {
            destination_bucket: destination_bucket.into(),
            artifact_root: PathBuf::from(ARTIFACT_ROOT),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// # Errors
    /// [`PipelineError::InvalidConfig`] if the destination bucket
    /// variable is unset or empty.
    pub fn from_env() -> Result<Self, PipelineError> {
        let destination_bucket: String =
            std::env::var(DEST_BUCKET_ENV_VAR).map_err(|_| PipelineError::InvalidConfig {
                message: format!("{DEST_BUCKET_ENV_VAR} is not set"),
            })?;

        if destination_bucket.is_empty() {
            return Err(PipelineError::InvalidConfig {
                message: format!("{DEST_BUCKET_ENV_VAR} is empty"),
            });
        }

        Ok(Self::new(destination_bucket))
    }

    /// Override the artifact root (used by tests to keep runs isolated).
    pub fn with_artifact_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.artifact_root = root.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_root() {
        let config: PipelineConfig = PipelineConfig::new("dest");
        assert_eq!(config.destination_bucket, "dest");
        assert_eq!(config.artifact_root, PathBuf::from(ARTIFACT_ROOT));
    }

    #[test]
    fn test_with_artifact_root() {
        let config: PipelineConfig = PipelineConfig::new("dest").with_artifact_root("/scratch");
        assert_eq!(config.artifact_root, PathBuf::from("/scratch"));
    }
}
