//! Folio API Library
//!
//! This crate provides the HTTP handlers, the request gatekeeper, and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use services::UploadGate;
