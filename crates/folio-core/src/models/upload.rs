use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

const MB: u64 = 1024 * 1024;

/// Broad class of an uploaded file. Decides the size ceiling and the MIME allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Image,
    Document,
}

impl FileKind {
    pub fn max_size_bytes(&self) -> u64 {
        match self {
            FileKind::Image => 5 * MB,
            FileKind::Document => 10 * MB,
        }
    }

    pub fn allowed_content_types(&self) -> &'static [&'static str] {
        match self {
            FileKind::Image => &["image/jpeg", "image/png", "image/webp", "image/gif"],
            FileKind::Document => &[
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FileKind::Image => "Image",
            FileKind::Document => "Document",
        }
    }
}

/// Storage folder an upload lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UploadCategory {
    ProjectImages,
    ResumeImages,
    Resumes,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadCategory::ProjectImages => "project-images",
            UploadCategory::ResumeImages => "resume-images",
            UploadCategory::Resumes => "resumes",
        }
    }

    pub fn kind(&self) -> FileKind {
        match self {
            UploadCategory::ProjectImages | UploadCategory::ResumeImages => FileKind::Image,
            UploadCategory::Resumes => FileKind::Document,
        }
    }
}

impl fmt::Display for UploadCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project-images" => Ok(UploadCategory::ProjectImages),
            "resume-images" => Ok(UploadCategory::ResumeImages),
            "resumes" => Ok(UploadCategory::Resumes),
            other => Err(format!("Unknown upload category: {}", other)),
        }
    }
}

/// What the client says about a file before any bytes are stored.
#[derive(Debug, Clone)]
pub struct UploadDescriptor {
    pub filename: String,
    pub content_type: String,
    pub byte_length: u64,
}

impl UploadDescriptor {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        byte_length: u64,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            byte_length,
        }
    }
}

/// Grant to PUT one object into storage.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    pub upload_url: String,
    /// Public path of the object, always beginning with `/`
    pub path: String,
    pub expires_at: DateTime<Utc>,
}

/// Response for image uploads handled by the server
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileResponse {
    pub image_path: String,
}

/// Response for resume document uploads
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUploadResponse {
    pub success: bool,
    pub image_path: String,
}

/// Request to remove a previously uploaded resume image
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageRequest {
    #[serde(default)]
    pub image_path: String,
}

/// Request for a presigned URL the browser uploads to directly
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PresignUploadRequest {
    pub category: UploadCategory,
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: String,
    /// Content type (MIME type)
    #[validate(length(
        min = 1,
        max = 255,
        message = "Content type must be between 1 and 255 characters"
    ))]
    pub content_type: String,
    /// File size in bytes
    #[validate(range(min = 1, message = "File size must be at least 1 byte"))]
    pub file_size: u64,
    /// Base64 of the first bytes of the file (up to 8 are inspected)
    #[validate(length(min = 1, max = 64, message = "Leading bytes are required"))]
    pub leading_bytes: String,
}

/// Presigned upload grant returned to the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresignUploadResponse {
    /// Presigned URL for a direct PUT
    pub upload_url: String,
    /// Path the object will be served from
    pub image_path: String,
    /// URL expiration time
    pub expires_at: DateTime<Utc>,
}

impl From<UploadTicket> for PresignUploadResponse {
    fn from(ticket: UploadTicket) -> Self {
        Self {
            upload_url: ticket.upload_url,
            image_path: ticket.path,
            expires_at: ticket.expires_at,
        }
    }
}
