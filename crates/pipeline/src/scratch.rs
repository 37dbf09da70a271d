//! Run-scoped scratch directory lifecycle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::context::RunContext;
use crate::error::PipelineError;

/// Allocates and tears down the per-run directory tree on local
/// ephemeral storage.
///
/// Each run gets its own download and extraction directories under the
/// artifact root, keyed by the run identifier, so concurrent invocations
/// on a shared execution environment cannot collide.
pub struct ScratchSpace {
    root: PathBuf,
}

impl ScratchSpace {
    /// Create a scratch space rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create this run's download and extraction directories.
    ///
    /// A stale artifact root whose top-level stat fails is swept away
    /// first (best effort). A readable root is reused as-is: it may
    /// belong to a concurrently executing sibling invocation and must
    /// never be removed blindly.
    ///
    /// # Errors
    /// [`PipelineError::ScratchUnavailable`] if directory creation fails
    /// (insufficient space, permission denied). Fatal to the invocation;
    /// scratch exhaustion will not self-resolve within the same run.
    pub fn prepare(&self, context: &RunContext) -> Result<(), PipelineError> {
        self.sweep_stale_root();

        create_open_dir(&context.download_dir)?;
        create_open_dir(&context.extract_dir)?;

        Ok(())
    }

    /// Best-effort removal of this run's directories after a successful
    /// invocation. Failures are logged and swallowed; a failed run's tree
    /// is left for the next invocation's sweep.
    pub fn cleanup(&self, context: &RunContext) {
        for dir in [&context.download_dir, &context.extract_dir] {
            if let Err(e) = fs::remove_dir_all(dir) {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!("Scratch cleanup of {} failed: {}", dir.display(), e);
                }
            }
        }
    }

    /// Remove the artifact root if its top-level stat fails, which marks
    /// it as stale leftover state from a prior run.
    fn sweep_stale_root(&self) {
        match fs::metadata(&self.root) {
            Ok(_) => { /* readable root, possibly in use by a sibling run */ }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                log::warn!(
                    "Artifact root {} is unreadable ({}), sweeping",
                    self.root.display(),
                    e
                );
                if let Err(e) = fs::remove_dir_all(&self.root) {
                    log::warn!("Sweep of {} failed: {}", self.root.display(), e);
                }
            }
        }
    }
}

/// Create a directory (with ancestors) with open traversal permissions.
fn create_open_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).map_err(|e| PipelineError::ScratchUnavailable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    set_dir_mode(path)?;

    Ok(())
}

#[cfg(unix)]
fn set_dir_mode(path: &Path) -> Result<(), PipelineError> {
    use std::os::unix::fs::PermissionsExt;

    use bucket_unzip_common::SCRATCH_DIR_MODE;

    fs::set_permissions(path, fs::Permissions::from_mode(SCRATCH_DIR_MODE)).map_err(|e| {
        PipelineError::ScratchUnavailable {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })
}

#[cfg(not(unix))]
fn set_dir_mode(_path: &Path) -> Result<(), PipelineError> {
    Ok(())
}
