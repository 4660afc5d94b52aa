//! Folio Core Library
//!
//! This crate provides configuration, error types, upload models, and the pure
//! upload validation rules shared by the storage, infra and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PortfolioConfig, RateLimitBackend, RateLimitConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{FileKind, UploadCategory, UploadDescriptor, UploadTicket};
pub use validation::upload::UploadValidationError;
