//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use folio_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "0.1.0",
        description = "Upload and session endpoints for the portfolio admin panel. Uploads are validated by size, declared type and file signature before a presigned storage URL is issued."
    ),
    paths(
        handlers::uploads::upload_project_image,
        handlers::uploads::upload_resume_image,
        handlers::uploads::delete_resume_image,
        handlers::uploads::upload_resume,
        handlers::presign::create_presigned_upload,
        handlers::session::get_admin_session,
    ),
    components(schemas(
        error::ErrorResponse,
        models::UploadCategory,
        models::UploadedFileResponse,
        models::ResumeUploadResponse,
        models::DeleteImageRequest,
        models::PresignUploadRequest,
        models::PresignUploadResponse,
        handlers::session::AdminSessionResponse,
    )),
    tags(
        (name = "uploads", description = "File uploads to object storage"),
        (name = "session", description = "Admin session")
    )
)]
pub struct ApiDoc;
