//! Upload validation
//!
//! Pure checks run against an upload before storage is touched: the declared size, the
//! declared MIME type, and the file's leading bytes. Also home to filename sanitization
//! for storage keys.

use crate::error::AppError;
use crate::models::FileKind;

/// Number of leading bytes inspected by [`check_signature`].
pub const SIGNATURE_PREFIX_LENGTH: usize = 8;

/// Longest sanitized filename.
pub const MAX_FILENAME_LENGTH: usize = 100;

const FALLBACK_FILENAME: &str = "file";

/// Magic numbers per MIME type.
///
/// WebP only checks the RIFF container header, so any RIFF file (WAV, AVI) declared as
/// `image/webp` passes.
const SIGNATURES: &[(&str, &[&[u8]])] = &[
    ("image/jpeg", &[&[0xFF, 0xD8, 0xFF]]),
    ("image/png", &[&[0x89, 0x50, 0x4E, 0x47]]),
    ("image/webp", &[&[0x52, 0x49, 0x46, 0x46]]),
    ("image/gif", &[&[0x47, 0x49, 0x46, 0x38]]),
    ("application/pdf", &[&[0x25, 0x50, 0x44, 0x46]]),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &[&[0x50, 0x4B, 0x03, 0x04]],
    ),
    ("application/msword", &[&[0xD0, 0xCF, 0x11, 0xE0]]),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadValidationError {
    #[error("{kind} too large. Maximum size: {}MB", .max / (1024 * 1024))]
    TooLarge {
        kind: &'static str,
        size: u64,
        max: u64,
    },

    #[error("Invalid file type '{content_type}'. Allowed types: {}", .allowed.join(", "))]
    DisallowedType {
        content_type: String,
        allowed: &'static [&'static str],
    },

    #[error("File type '{0}' is not supported")]
    UnknownType(String),

    #[error("File content does not match declared type '{0}'")]
    SignatureMismatch(String),
}

impl From<UploadValidationError> for AppError {
    fn from(err: UploadValidationError) -> Self {
        match err {
            UploadValidationError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            UploadValidationError::DisallowedType { .. }
            | UploadValidationError::UnknownType(_)
            | UploadValidationError::SignatureMismatch(_) => {
                AppError::InvalidFileType(err.to_string())
            }
        }
    }
}

/// Drop MIME parameters (`; charset=...`), trim and lowercase.
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

pub fn check_size(byte_length: u64, kind: FileKind) -> Result<(), UploadValidationError> {
    let max = kind.max_size_bytes();
    if byte_length > max {
        return Err(UploadValidationError::TooLarge {
            kind: kind.label(),
            size: byte_length,
            max,
        });
    }
    Ok(())
}

pub fn check_content_type(declared: &str, kind: FileKind) -> Result<(), UploadValidationError> {
    let normalized = normalize_mime_type(declared);
    let allowed = kind.allowed_content_types();
    if !allowed.contains(&normalized.as_str()) {
        return Err(UploadValidationError::DisallowedType {
            content_type: normalized,
            allowed,
        });
    }
    Ok(())
}

/// Check the file's leading bytes against the magic numbers registered for `declared`.
///
/// Fails closed: an unregistered type is rejected, as is input shorter than the prefix.
pub fn check_signature(first_bytes: &[u8], declared: &str) -> Result<(), UploadValidationError> {
    let normalized = normalize_mime_type(declared);
    let prefixes = SIGNATURES
        .iter()
        .find(|(mime, _)| *mime == normalized)
        .map(|(_, prefixes)| *prefixes)
        .ok_or_else(|| UploadValidationError::UnknownType(normalized.clone()))?;

    let head = leading_bytes(first_bytes);
    if prefixes.iter().any(|prefix| head.starts_with(prefix)) {
        Ok(())
    } else {
        Err(UploadValidationError::SignatureMismatch(normalized))
    }
}

/// First [`SIGNATURE_PREFIX_LENGTH`] bytes of `data`, or all of it when shorter.
pub fn leading_bytes(data: &[u8]) -> &[u8] {
    &data[..data.len().min(SIGNATURE_PREFIX_LENGTH)]
}

/// Reduce a client filename to a safe storage key segment.
///
/// Keeps only `[A-Za-z0-9.-]`, collapses consecutive dots, and caps the length. Applying it
/// twice gives the same result as applying it once.
pub fn sanitize_filename(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len().min(MAX_FILENAME_LENGTH));
    for c in name.chars() {
        if !(c.is_ascii_alphanumeric() || c == '.' || c == '-') {
            continue;
        }
        if c == '.' && sanitized.ends_with('.') {
            continue;
        }
        sanitized.push(c);
    }
    sanitized.truncate(MAX_FILENAME_LENGTH);

    if sanitized.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized
    }
}
