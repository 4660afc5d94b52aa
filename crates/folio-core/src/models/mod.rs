//! Data models for the application
//!
//! Upload categories, file kinds, and the request/response bodies of the upload routes.

mod upload;

pub use upload::*;
