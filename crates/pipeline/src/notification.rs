//! The storage-upload notification record that triggers an invocation.
//!
//! Models the storage service's event JSON shape closely enough to pull
//! out the source bucket and key; everything else in the payload is
//! ignored. Keys are opaque identifiers and are never re-derived from
//! their apparent path structure.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A storage event as delivered by the trigger, possibly batching
/// several records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records")]
    pub records: Vec<S3EventRecord>,
}

/// One record within a storage event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

/// The bucket/object pair a record refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3BucketRef,
    pub object: S3ObjectRef,
}

/// Bucket reference within a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3BucketRef {
    pub name: String,
}

/// Object reference within a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3ObjectRef {
    pub key: String,
}

/// The resolved trigger input: one uploaded archive to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadNotification {
    /// Bucket the archive was uploaded to.
    pub bucket: String,
    /// Key of the uploaded archive (opaque).
    pub key: String,
}

impl UploadNotification {
    /// Resolve the notification from the event's first record.
    ///
    /// # Errors
    /// [`PipelineError::EmptyNotification`] if the record list is empty.
    pub fn from_event(event: &S3Event) -> Result<Self, PipelineError> {
        let record: &S3EventRecord = event
            .records
            .first()
            .ok_or(PipelineError::EmptyNotification)?;

        Ok(Self {
            bucket: record.s3.bucket.name.clone(),
            key: record.s3.object.key.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_EVENT: &str = r#"{
        "Records": [
            {
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "upload-bucket", "arn": "arn:aws:s3:::upload-bucket" },
                    "object": { "key": "builds/a.zip", "size": 1024 }
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_event_json() {
        let event: S3Event = serde_json::from_str(SAMPLE_EVENT).unwrap();
        let notification: UploadNotification = UploadNotification::from_event(&event).unwrap();
        assert_eq!(notification.bucket, "upload-bucket");
        assert_eq!(notification.key, "builds/a.zip");
    }

    #[test]
    fn test_empty_records_rejected() {
        let event: S3Event = serde_json::from_str(r#"{"Records": []}"#).unwrap();
        let err: PipelineError = UploadNotification::from_event(&event).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyNotification));
    }

    #[test]
    fn test_key_is_opaque() {
        // Path-like segments in the key are kept verbatim
        let event: S3Event = serde_json::from_str(SAMPLE_EVENT).unwrap();
        let notification: UploadNotification = UploadNotification::from_event(&event).unwrap();
        assert_eq!(notification.key, "builds/a.zip");
    }
}
