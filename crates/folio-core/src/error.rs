//! Error types module
//!
//! This module provides the core error type used throughout Folio. Every failure an
//! HTTP handler or middleware can surface is one `AppError` variant, and each variant
//! describes its own HTTP presentation through [`ErrorMetadata`].

const MAX_REPORTED_CAUSES: usize = 5;

/// Level an error is logged at when it reaches the HTTP boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Client mistakes: bad uploads, missing sessions
    Debug,
    /// Throttling
    Warn,
    /// Storage and internal failures
    Error,
}

/// HTTP presentation of an error
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable machine-readable code, e.g. `INVALID_FILE_TYPE`
    fn error_code(&self) -> &'static str;

    /// Retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show the caller
    fn client_message(&self) -> String;

    /// Details must never be sent to the caller
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// How one variant is presented over HTTP
struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const fn client_fault(status: u16, code: &'static str, action: &'static str) -> Presentation {
    Presentation {
        status,
        code,
        recoverable: false,
        action: Some(action),
        sensitive: false,
        level: LogLevel::Debug,
    }
}

const SERVER_FAULT: Presentation = Presentation {
    status: 500,
    code: "INTERNAL_ERROR",
    recoverable: true,
    action: Some("Retry after a short delay"),
    sensitive: true,
    level: LogLevel::Error,
};

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::InvalidInput(_) => client_fault(
                400,
                "INVALID_INPUT",
                "Check request parameters and try again",
            ),
            AppError::BadRequest(_) => {
                client_fault(400, "BAD_REQUEST", "Check request format and parameters")
            }
            AppError::InvalidFileType(_) => client_fault(
                400,
                "INVALID_FILE_TYPE",
                "Upload a file whose content matches its declared type",
            ),
            AppError::Unauthorized(_) => client_fault(
                401,
                "UNAUTHORIZED",
                "Sign in again to obtain a fresh session",
            ),
            AppError::PayloadTooLarge(_) => {
                client_fault(413, "PAYLOAD_TOO_LARGE", "Reduce file size and try again")
            }
            AppError::TooManyRequests(_) => Presentation {
                recoverable: true,
                level: LogLevel::Warn,
                ..client_fault(
                    429,
                    "TOO_MANY_REQUESTS",
                    "Wait for the rate limit window to pass and retry",
                )
            },
            AppError::Storage(_) => Presentation {
                code: "STORAGE_ERROR",
                ..SERVER_FAULT
            },
            AppError::Internal(_) | AppError::InternalWithSource { .. } => SERVER_FAULT,
        }
    }
}

impl AppError {
    /// Variant name, reported as `error_type` outside production
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::InvalidFileType(_) => "InvalidFileType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::TooManyRequests(_) => "TooManyRequests",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Display text followed by up to five `Caused by:` lines from the source chain
    pub fn detailed_message(&self) -> String {
        let mut details = self.to_string();
        let mut causes =
            std::iter::successors(std::error::Error::source(self), |err| err.source());

        for cause in causes.by_ref().take(MAX_REPORTED_CAUSES) {
            details.push_str(&format!("\n  Caused by: {}", cause));
        }
        if causes.next().is_some() {
            details.push_str("\n  ... (truncated)");
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::InvalidInput(msg)
            | AppError::BadRequest(msg)
            | AppError::InvalidFileType(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::TooManyRequests(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
        }
    }
}
