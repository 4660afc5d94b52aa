//! Server-side upload handlers
//!
//! The browser posts the file to the API, which runs it through the upload gate and then
//! PUTs the bytes to the presigned URL on the caller's behalf.

use crate::auth::AdminSession;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, MultipartFile};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use folio_core::models::{DeleteImageRequest, ResumeUploadResponse, UploadedFileResponse};
use folio_core::validation::leading_bytes;
use folio_core::{AppError, UploadCategory, UploadDescriptor};
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;

/// Authorize a received file and write it to storage. Returns the object's public path.
async fn store_file(
    state: &AppState,
    file: MultipartFile,
    category: UploadCategory,
) -> Result<String, HttpAppError> {
    let descriptor = UploadDescriptor::new(
        file.filename,
        file.content_type.clone(),
        file.data.len() as u64,
    );

    let ticket = state
        .upload_gate
        .authorize(&descriptor, category, leading_bytes(&file.data))
        .await?;

    let start = std::time::Instant::now();
    let response = state
        .http_client
        .put(&ticket.upload_url)
        .header(CONTENT_TYPE, file.content_type)
        .body(file.data)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("Upload to storage failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::Storage(format!(
            "Storage rejected upload with status {}",
            response.status()
        ))
        .into());
    }

    tracing::info!(
        path = %ticket.path,
        size_bytes = descriptor.byte_length,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "File stored"
    );

    Ok(ticket.path)
}

/// Upload a project image
#[utoipa::path(
    post,
    path = "/api/project-images",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadedFileResponse),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 401, description = "No admin session", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(admin_id = %session.admin_id))]
pub async fn upload_project_image(
    session: AdminSession,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;
    let image_path = store_file(&state, file, UploadCategory::ProjectImages).await?;
    Ok(Json(UploadedFileResponse { image_path }))
}

/// Upload an image shown on the resume page
#[utoipa::path(
    post,
    path = "/api/resume-images",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = UploadedFileResponse),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 401, description = "No admin session", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(admin_id = %session.admin_id))]
pub async fn upload_resume_image(
    session: AdminSession,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;
    let image_path = store_file(&state, file, UploadCategory::ResumeImages).await?;
    Ok(Json(UploadedFileResponse { image_path }))
}

/// Remove a resume image. Storage failures are logged and not reported.
#[utoipa::path(
    delete,
    path = "/api/resume-images",
    tag = "uploads",
    request_body = DeleteImageRequest,
    responses(
        (status = 204, description = "Image removed"),
        (status = 400, description = "Missing image path", body = ErrorResponse),
        (status = 401, description = "No admin session", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(admin_id = %session.admin_id))]
pub async fn delete_resume_image(
    session: AdminSession,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteImageRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let image_path = request.image_path.trim();
    if image_path.is_empty() {
        return Err(AppError::BadRequest("imagePath is required".to_string()).into());
    }

    state.upload_gate.discard(image_path).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload the resume document
#[utoipa::path(
    post,
    path = "/api/resume",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document stored", body = ResumeUploadResponse),
        (status = 400, description = "Invalid file", body = ErrorResponse),
        (status = 401, description = "No admin session", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(admin_id = %session.admin_id))]
pub async fn upload_resume(
    session: AdminSession,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;
    let image_path = store_file(&state, file, UploadCategory::Resumes).await?;
    Ok(Json(ResumeUploadResponse {
        success: true,
        image_path,
    }))
}
