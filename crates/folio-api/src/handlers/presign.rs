use crate::auth::AdminSession;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use base64::Engine;
use folio_core::models::{PresignUploadRequest, PresignUploadResponse};
use folio_core::validation::leading_bytes;
use folio_core::{AppError, UploadDescriptor};
use std::sync::Arc;
use validator::Validate;

/// Issue a presigned URL for a direct browser upload
#[utoipa::path(
    post,
    path = "/api/uploads/presign",
    tag = "uploads",
    request_body = PresignUploadRequest,
    responses(
        (status = 200, description = "Presigned URL generated", body = PresignUploadResponse),
        (status = 400, description = "Invalid input or file type", body = ErrorResponse),
        (status = 401, description = "No admin session", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        admin_id = %session.admin_id,
        category = %request.category,
        operation = "presign_upload"
    )
)]
pub async fn create_presigned_upload(
    session: AdminSession,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<PresignUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let first_bytes = base64::engine::general_purpose::STANDARD
        .decode(request.leading_bytes.trim())
        .map_err(|e| AppError::InvalidInput(format!("leadingBytes is not valid base64: {}", e)))?;

    let descriptor =
        UploadDescriptor::new(request.filename, request.content_type, request.file_size);
    let ticket = state
        .upload_gate
        .authorize(&descriptor, request.category, leading_bytes(&first_bytes))
        .await?;

    Ok(Json(PresignUploadResponse::from(ticket)))
}
