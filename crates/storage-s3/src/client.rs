//! AWS SDK S3 client implementation.

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use bucket_unzip_storage::{ObjectInfo, StorageClient, StorageError};

/// Region and credential settings for the S3 backend.
#[derive(Debug, Clone)]
pub struct S3Settings {
    /// AWS region.
    pub region: String,
    /// Explicit credentials; `None` uses the default credential chain.
    pub credentials: Option<AwsCredentialsConfig>,
}

impl S3Settings {
    /// Settings for a region with the default credential chain.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            credentials: None,
        }
    }
}

/// Explicit AWS credentials.
#[derive(Debug, Clone)]
pub struct AwsCredentialsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// `StorageClient` implementation using the AWS SDK for Rust.
///
/// Provides streaming transfers in both directions with the SDK's
/// built-in connection pooling.
pub struct S3StorageClient {
    /// The underlying S3 client.
    s3_client: S3Client,
}

impl S3StorageClient {
    /// Create a new client for the configured region.
    ///
    /// # Arguments
    /// * `settings` - Region and optional explicit credentials
    pub async fn new(settings: S3Settings) -> Self {
        let config_loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(settings.region.clone()));

        let config_loader = if let Some(ref creds) = settings.credentials {
            let credentials = Credentials::new(
                &creds.access_key_id,
                &creds.secret_access_key,
                creds.session_token.clone(),
                None,
                "bucket-unzip",
            );
            config_loader.credentials_provider(credentials)
        } else {
            config_loader
        };

        let sdk_config = config_loader.load().await;
        Self {
            s3_client: S3Client::new(&sdk_config),
        }
    }

    /// Create a client from an existing S3 client (for testing).
    ///
    /// # Arguments
    /// * `s3_client` - Pre-configured S3 client
    pub fn from_client(s3_client: S3Client) -> Self {
        Self { s3_client }
    }
}

#[async_trait]
impl StorageClient for S3StorageClient {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::NetworkError {
                        message: service_err.to_string(),
                    }
                }
            })?;

        let data: Vec<u8> = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::NetworkError {
                message: e.to_string(),
            })?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn get_object_to_file(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> Result<(), StorageError> {
        let response = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    StorageError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    StorageError::NetworkError {
                        message: service_err.to_string(),
                    }
                }
            })?;

        let mut file: File = File::create(file_path)
            .await
            .map_err(|e| StorageError::from_io(file_path.display().to_string(), e))?;

        let mut body = response.body;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StorageError::NetworkError {
                message: e.to_string(),
            })?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| StorageError::from_io(file_path.display().to_string(), e))?;
        }

        file.flush()
            .await
            .map_err(|e| StorageError::from_io(file_path.display().to_string(), e))?;

        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let body = ByteStream::from(data.to_vec());

        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|err| StorageError::NetworkError {
                message: err.to_string(),
            })?;

        Ok(())
    }

    async fn put_object_from_file(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> Result<(), StorageError> {
        let body = ByteStream::from_path(file_path)
            .await
            .map_err(|e| StorageError::IoError {
                path: file_path.display().to_string(),
                message: e.to_string(),
            })?;

        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|err| StorageError::NetworkError {
                message: err.to_string(),
            })?;

        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: &str,
    ) -> Result<Vec<ObjectInfo>, StorageError> {
        let mut objects: Vec<ObjectInfo> = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .s3_client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix);

            if let Some(ref token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|err| StorageError::NetworkError {
                    message: err.to_string(),
                })?;

            if let Some(ref contents) = response.contents {
                for obj in contents {
                    objects.push(ObjectInfo {
                        key: obj.key().unwrap_or_default().to_string(),
                        size: obj.size().map(|s| s as u64).unwrap_or(0),
                    });
                }
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token.clone();
            } else {
                break;
            }
        }

        Ok(objects)
    }
}
