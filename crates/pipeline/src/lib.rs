//! Notification-driven pipeline for bucket-unzip.
//!
//! One invocation handles one upload notification: it prepares run-scoped
//! scratch space, downloads the named ZIP archive, extracts it, and
//! uploads every extracted file to the destination bucket under its
//! archive-relative key. Stages run strictly sequentially and the first
//! failure aborts the invocation; retry/redelivery is owned by the
//! triggering event system.

pub mod config;
pub mod context;
pub mod error;
pub mod notification;
pub mod orchestrator;
pub mod scratch;

// Re-export main types
pub use config::PipelineConfig;
pub use context::RunContext;
pub use error::PipelineError;
pub use notification::{S3Event, UploadNotification};
pub use orchestrator::{PipelineOrchestrator, PipelineReport, PipelineState};
pub use scratch::ScratchSpace;
