//! Validation modules

pub mod upload;

pub use upload::{
    check_content_type, check_signature, check_size, leading_bytes, normalize_mime_type,
    sanitize_filename, UploadValidationError, MAX_FILENAME_LENGTH, SIGNATURE_PREFIX_LENGTH,
};
