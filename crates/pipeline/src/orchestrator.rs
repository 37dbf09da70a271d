//! Stage sequencing for one pipeline invocation.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bucket_unzip_archive::extract_archive;
use bucket_unzip_storage::{ObjectDistributor, ObjectFetcher, StorageClient};

use crate::config::PipelineConfig;
use crate::context::RunContext;
use crate::error::PipelineError;
use crate::notification::{S3Event, UploadNotification};
use crate::scratch::ScratchSpace;

/// Progress of an invocation through the pipeline.
///
/// Each stage's failure transitions directly to `Failed`; there is no
/// partial-success completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Invocation entry.
    Idle,
    /// Scratch directories exist.
    DirectoryPrepared,
    /// Source archive is on local disk.
    Downloaded,
    /// Archive contents are on local disk.
    Extracted,
    /// Every extracted file is in the destination bucket.
    Uploaded,
    /// Terminal success.
    Done,
    /// Terminal failure.
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name: &str = match self {
            PipelineState::Idle => "idle",
            PipelineState::DirectoryPrepared => "directory-prepared",
            PipelineState::Downloaded => "downloaded",
            PipelineState::Extracted => "extracted",
            PipelineState::Uploaded => "uploaded",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a completed invocation.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Run identifier the invocation's scratch paths were keyed by.
    pub run_id: String,
    /// Regular files written during extraction.
    pub files_extracted: u64,
    /// Objects uploaded to the destination bucket.
    pub files_uploaded: u64,
}

/// Receives one notification and sequences scratch preparation, download,
/// extraction, and upload, aborting the run on first failure.
pub struct PipelineOrchestrator {
    client: Arc<dyn StorageClient>,
    config: PipelineConfig,
}

impl PipelineOrchestrator {
    /// Create an orchestrator over a storage client and configuration.
    pub fn new(client: Arc<dyn StorageClient>, config: PipelineConfig) -> Self {
        Self { client, config }
    }

    /// Handle one storage event end to end.
    ///
    /// # Arguments
    /// * `event` - The trigger's event payload (first record is used)
    /// * `request_id` - The runtime's request identifier, logged if present
    ///
    /// # Errors
    /// The first failing stage's error; nothing is retried locally.
    pub async fn handle(
        &self,
        event: &S3Event,
        request_id: Option<&str>,
    ) -> Result<PipelineReport, PipelineError> {
        if let Some(id) = request_id {
            log::info!("Request id: {}", id);
        }

        let notification: UploadNotification = UploadNotification::from_event(event)?;
        self.run(&notification).await
    }

    /// Run the pipeline for one notification with a fresh run context.
    pub async fn run(
        &self,
        notification: &UploadNotification,
    ) -> Result<PipelineReport, PipelineError> {
        let context: RunContext =
            RunContext::new(&self.config, &notification.bucket, &notification.key);
        self.run_with_context(&context).await
    }

    /// Run the pipeline with an explicit context (fixed run identifiers in
    /// tests).
    pub async fn run_with_context(
        &self,
        context: &RunContext,
    ) -> Result<PipelineReport, PipelineError> {
        log::info!(
            "Run {}: bucket: {}, key: {}",
            context.run_id,
            context.source_bucket,
            context.source_key
        );

        let mut state: PipelineState = PipelineState::Idle;
        let scratch: ScratchSpace = ScratchSpace::new(&self.config.artifact_root);

        if let Err(e) = scratch.prepare(context) {
            return Err(self.fail(&mut state, context, e));
        }
        state = self.advance(state, PipelineState::DirectoryPrepared);

        let fetcher: ObjectFetcher = ObjectFetcher::new(self.client.clone());
        let archive_path: PathBuf = match fetcher
            .fetch(
                &context.source_bucket,
                &context.source_key,
                &context.archive_path,
            )
            .await
        {
            Ok(path) => path,
            Err(e) => {
                let err = PipelineError::FetchFailed {
                    bucket: context.source_bucket.clone(),
                    key: context.source_key.clone(),
                    source: e,
                };
                return Err(self.fail(&mut state, context, err));
            }
        };
        state = self.advance(state, PipelineState::Downloaded);

        let files_extracted: u64 = match extract_archive(&archive_path, &context.extract_dir) {
            Ok(count) => count,
            Err(e) => return Err(self.fail(&mut state, context, e.into())),
        };
        state = self.advance(state, PipelineState::Extracted);

        let distributor: ObjectDistributor = ObjectDistributor::new(self.client.clone());
        let files_uploaded: u64 = match distributor
            .distribute(&context.extract_dir, &context.destination_bucket)
            .await
        {
            Ok(count) => count,
            Err(e) => {
                let err = PipelineError::UploadFailed {
                    bucket: context.destination_bucket.clone(),
                    source: e,
                };
                return Err(self.fail(&mut state, context, err));
            }
        };
        state = self.advance(state, PipelineState::Uploaded);

        scratch.cleanup(context);
        self.advance(state, PipelineState::Done);

        log::info!(
            "Run {}: {} unzipped to bucket {} ({} files)",
            context.run_id,
            archive_path.display(),
            context.destination_bucket,
            files_uploaded
        );

        Ok(PipelineReport {
            run_id: context.run_id.clone(),
            files_extracted,
            files_uploaded,
        })
    }

    /// Log a state transition and return the new state.
    fn advance(&self, from: PipelineState, to: PipelineState) -> PipelineState {
        log::debug!("Pipeline state: {} -> {}", from, to);
        to
    }

    /// Log the failing stage with bucket/key context and mark the run
    /// failed. The error is returned to the invoking runtime unchanged.
    fn fail(
        &self,
        state: &mut PipelineState,
        context: &RunContext,
        err: PipelineError,
    ) -> PipelineError {
        log::error!(
            "Run {}: {} stage failed for s3://{}/{}: {}",
            context.run_id,
            err.stage(),
            context.source_bucket,
            context.source_key,
            err
        );
        *state = PipelineState::Failed;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::Idle.to_string(), "idle");
        assert_eq!(
            PipelineState::DirectoryPrepared.to_string(),
            "directory-prepared"
        );
        assert_eq!(PipelineState::Failed.to_string(), "failed");
    }
}
