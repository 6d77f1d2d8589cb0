use crate::config::StorageSettings;
use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to object storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to store object {key}: {message}")]
    Put { key: String, message: String },

    #[error("failed to sign URL for object {key}: {message}")]
    Sign { key: String, message: String },

    #[error("failed to delete object {key}: {message}")]
    Delete { key: String, message: String },
}

/// Put/sign/delete operations against a single bucket
///
/// The handlers only ever see this trait, so tests can substitute an
/// in-memory implementation and the production wiring stays in main.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a blob under the given key, overwriting any existing object
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    /// Issue a time-limited GET URL for a previously stored object
    async fn signed_get_url(&self, key: &str, expires_in: Duration) -> Result<String, StorageError>;

    /// Remove a stored object
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

/// S3 object store client
///
/// Credentials come from the standard AWS environment/profile chain; region
/// and bucket come from the application settings. An endpoint override is
/// supported for S3-compatible stores.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from the storage settings
    pub async fn from_settings(settings: &StorageSettings) -> Self {
        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: settings.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!("Stored object {} ({} bytes)", key, size);

        Ok(())
    }

    async fn signed_get_url(&self, key: &str, expires_in: Duration) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| StorageError::Sign {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Sign {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!("Deleted object {}", key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Put {
            key: "pairs/abc/subject".to_string(),
            message: "access denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to store object pairs/abc/subject: access denied"
        );
    }
}
