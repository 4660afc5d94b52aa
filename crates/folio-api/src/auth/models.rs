use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::AppError;
use serde::{Deserialize, Serialize};

/// Claims carried by an admin session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "adminId")]
    pub admin_id: String,
    pub exp: i64, // expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>, // issued at timestamp
}

/// Authenticated admin, stored in request extensions by the gatekeeper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub admin_id: String,
}

// Extension cannot be used with Multipart, so we extract directly from request parts
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Admin session required".to_string(),
                ))
            })
    }
}
