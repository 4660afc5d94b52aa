use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, Result as ObjectResult};
use std::time::Duration;

/// S3 storage implementation
///
/// Deletes go through `object_store`. Upload URLs are presigned with the AWS SDK so the
/// declared `Content-Type` is one of the signed headers: a PUT with any other type is
/// rejected by the bucket.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    presigner: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region, or `auto` for Cloudflare R2
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "https://<account>.r2.cloudflarestorage.com", "http://localhost:9000" for MinIO)
    ///
    /// Credentials are read from the standard `AWS_*` environment variables.
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = &endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .load()
            .await;
        let mut s3_config = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint_url {
            // S3-compatible providers want path-style addressing
            s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
        }
        let presigner = Client::from_conf(s3_config.build());

        Ok(S3Storage {
            store,
            presigner,
            bucket,
        })
    }

    fn location(storage_key: &str) -> StorageResult<Path> {
        if storage_key.is_empty() || storage_key.starts_with('/') || storage_key.contains("..") {
            return Err(StorageError::InvalidKey(storage_key.to_string()));
        }
        Ok(Path::from(storage_key))
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Self::location(storage_key)?;
        let start = std::time::Instant::now();

        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignFailed(e.to_string()))?;

        let request = self
            .presigner
            .put_object()
            .bucket(&self.bucket)
            .key(storage_key)
            .content_type(content_type)
            .presigned(presigning_config)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 presign failed"
                );
                StorageError::PresignFailed(e.to_string())
            })?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            expires_in_secs = expires_in.as_secs(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 presigned PUT URL issued"
        );

        Ok(request.uri().to_string())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Self::location(storage_key)?;

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(_) => {}
            // Already gone
            Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }
}
