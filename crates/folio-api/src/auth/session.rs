//! HS256 session token verification

use crate::auth::models::SessionClaims;
use folio_core::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

/// Name of the cookie holding the admin session token
pub const ADMIN_TOKEN_COOKIE: &str = "admin-token";

/// Verifies admin session tokens against the shared HS256 secret.
///
/// Only the signature and `exp` are checked, with no leeway.
#[derive(Clone)]
pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session token rejected");
                AppError::Unauthorized("Invalid or expired session".to_string())
            })
    }
}
