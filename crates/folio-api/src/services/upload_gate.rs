//! Upload gate
//!
//! Decides whether a described file may be stored and, if so, hands back a short-lived
//! presigned PUT URL plus the public path the object will have. The gate never touches file
//! bytes beyond the leading signature bytes it is given.

use chrono::Utc;
use folio_core::validation::{check_content_type, check_signature, check_size};
use folio_core::{AppError, UploadCategory, UploadDescriptor, UploadTicket};
use folio_storage::{build_storage_key, key_for_path, keys_from_urls, path_for_key, Storage};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct UploadGate {
    storage: Arc<dyn Storage>,
    url_ttl: Duration,
}

impl UploadGate {
    pub fn new(storage: Arc<dyn Storage>, url_ttl: Duration) -> Self {
        Self { storage, url_ttl }
    }

    pub fn url_ttl(&self) -> Duration {
        self.url_ttl
    }

    /// Validate an upload and issue a presigned PUT for it.
    ///
    /// Checks run in order (size, declared type, signature) and storage is only contacted
    /// once all of them pass.
    pub async fn authorize(
        &self,
        descriptor: &UploadDescriptor,
        category: UploadCategory,
        first_bytes: &[u8],
    ) -> Result<UploadTicket, AppError> {
        let kind = category.kind();

        check_size(descriptor.byte_length, kind)?;
        check_content_type(&descriptor.content_type, kind)?;
        check_signature(first_bytes, &descriptor.content_type)?;

        let issued_at = Utc::now();
        let key = build_storage_key(category, &descriptor.filename, issued_at.timestamp_millis());

        let upload_url = self
            .storage
            .presigned_put_url(&key, &descriptor.content_type, self.url_ttl)
            .await?;

        let expires_at = issued_at
            + chrono::Duration::from_std(self.url_ttl)
                .map_err(|e| AppError::Internal(format!("Invalid upload URL TTL: {}", e)))?;

        tracing::info!(
            category = %category,
            key = %key,
            size_bytes = descriptor.byte_length,
            content_type = %descriptor.content_type,
            "Upload authorized"
        );

        Ok(UploadTicket {
            upload_url,
            path: path_for_key(&key),
            expires_at,
        })
    }

    /// Delete one stored object by its public path. Failures are logged, never returned.
    pub async fn discard(&self, path: &str) {
        let key = key_for_path(path);
        if key.is_empty() {
            return;
        }
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(path = %path, error = %e, "Failed to discard stored object");
        }
    }

    /// Delete stored objects by URL. Failures are logged, never returned.
    pub async fn discard_many(&self, urls: &[String]) {
        let keys = keys_from_urls(urls);
        if keys.is_empty() {
            return;
        }
        if let Err(e) = self.storage.delete_many(&keys).await {
            tracing::warn!(count = keys.len(), error = %e, "Failed to discard stored objects");
        }
    }
}
