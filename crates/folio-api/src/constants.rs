//! API constants

/// API base path prefix
pub const API_BASE: &str = "/api";

/// Largest request body accepted by the server: the document ceiling plus multipart overhead
pub const MAX_REQUEST_BODY_BYTES: usize = 11 * 1024 * 1024;

/// Timeout for the server-side PUT of an upload to its presigned URL
pub const STORAGE_PUT_TIMEOUT_SECS: u64 = 60;
