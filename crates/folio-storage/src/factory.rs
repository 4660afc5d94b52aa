use crate::{S3Storage, Storage, StorageError, StorageResult};
use folio_core::Config;
use std::sync::Arc;

/// Create the storage backend described by the configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let bucket = config
        .s3_bucket()
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
    let region = config.s3_region().to_string();
    let endpoint = config.s3_endpoint().map(String::from);

    tracing::info!(
        bucket = %bucket,
        region = %region,
        endpoint = endpoint.as_deref().unwrap_or("aws"),
        "Initializing S3 storage"
    );

    let storage = S3Storage::new(bucket, region, endpoint).await?;
    Ok(Arc::new(storage))
}
