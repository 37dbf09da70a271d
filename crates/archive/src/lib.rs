//! ZIP extraction for bucket-unzip.
//!
//! This crate reconstructs an archive's directory tree on local scratch
//! space:
//! - Entries are processed in the order recorded in the archive index
//! - Entry paths are validated against the extraction root before any write
//! - Stored unix mode bits are reapplied to extracted files

pub mod error;
pub mod extract;

// Re-export main types
pub use error::ExtractError;
pub use extract::extract_archive;
