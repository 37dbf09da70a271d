//! Storage abstraction for bucket-unzip S3 operations.
//!
//! This crate provides a backend-agnostic interface for moving files
//! between object storage and local scratch space:
//!
//! - [`StorageClient`] - low-level get/put/list operations, implemented per
//!   backend (AWS SDK in `bucket-unzip-storage-s3`, in-memory for tests)
//! - [`ObjectFetcher`] - downloads one named object to a local file
//! - [`ObjectDistributor`] - walks a local directory tree and uploads every
//!   regular file under its relative path as the destination key

mod distribute;
mod error;
mod fetch;
pub mod memory;
mod traits;

pub use distribute::ObjectDistributor;
pub use error::StorageError;
pub use fetch::ObjectFetcher;
pub use memory::MemoryStorageClient;
pub use traits::{ObjectInfo, StorageClient};
