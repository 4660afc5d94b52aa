//! Admin session authentication
//!
//! Sessions are HS256 JWTs carried in the `admin-token` cookie. The gatekeeper verifies the
//! cookie and stores an [`AdminSession`] in request extensions for handlers to extract.

pub mod models;
pub mod session;

pub use models::{AdminSession, SessionClaims};
pub use session::{SessionVerifier, ADMIN_TOKEN_COOKIE};
