//! HTTP error response format
//!
//! The `IntoResponse` conversion for `AppError` lives in the API crate (orphan rule); this
//! crate only owns the JSON shape so middleware and handlers render errors alike.

use folio_core::{AppError, ErrorMetadata};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Sign in again")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    /// Build the response body for an error. Details are only included when `expose_details`.
    pub fn from_app_error(error: &AppError, expose_details: bool) -> Self {
        let (details, error_type) = if expose_details {
            (
                Some(error.detailed_message()),
                Some(error.error_type().to_string()),
            )
        } else {
            (None, None)
        };

        Self {
            error: error.client_message(),
            details,
            error_type,
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_details_are_omitted_from_json() {
        let err = AppError::Unauthorized("Invalid session".to_string());
        let body = serde_json::to_value(ErrorResponse::from_app_error(&err, false)).unwrap();

        assert_eq!(body["error"], "Invalid session");
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert!(body.get("details").is_none());
        assert!(body.get("error_type").is_none());
    }

    #[test]
    fn test_exposed_details() {
        let err = AppError::InvalidFileType("bad".to_string());
        let body = ErrorResponse::from_app_error(&err, true);

        assert_eq!(body.error_type.as_deref(), Some("InvalidFileType"));
        assert_eq!(body.details.as_deref(), Some("Invalid file type: bad"));
    }
}
