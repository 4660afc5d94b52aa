//! Common utilities for file upload handlers

use axum::extract::Multipart;
use bytes::Bytes;
use folio_core::AppError;

/// A file read from a multipart form
#[derive(Debug)]
pub struct MultipartFile {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// Extract file data, filename, and content type from multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<MultipartFile, AppError> {
    let mut file: Option<MultipartFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if file.is_some() {
            return Err(AppError::BadRequest(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field
            .file_name()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| "file".to_string());
        let content_type = field
            .content_type()
            .map(|s: &str| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        file = Some(MultipartFile {
            data,
            filename,
            content_type,
        });
    }

    file.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))
}
