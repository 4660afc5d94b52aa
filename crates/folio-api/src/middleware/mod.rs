//! HTTP middleware

pub mod gatekeeper;

pub use folio_infra::{request_id_middleware, security_headers_middleware};
pub use gatekeeper::{gatekeeper_middleware, Gatekeeper, GatekeeperLimiters};
