//! AWS SDK S3 backend for bucket-unzip storage.
//!
//! This crate provides the `StorageClient` implementation used in real
//! deployments. Credentials and region selection live here; the pipeline
//! itself only names buckets and keys.
//!
//! # Example
//!
//! ```ignore
//! use bucket_unzip_storage_s3::{S3Settings, S3StorageClient};
//!
//! let settings = S3Settings::new("ap-northeast-1");
//! let client = S3StorageClient::new(settings).await;
//! ```

mod client;

pub use client::{AwsCredentialsConfig, S3Settings, S3StorageClient};
