//! Session token minting for tests.

#![allow(dead_code)]

use chrono::Utc;
use folio_api::auth::{SessionClaims, ADMIN_TOKEN_COOKIE};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Must match the secret in [`super::test_config`].
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

pub const TEST_ADMIN_ID: &str = "admin-test";

/// Sign a session token with `secret`, expiring `ttl_secs` from now.
pub fn mint_token(secret: &str, ttl_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = SessionClaims {
        admin_id: TEST_ADMIN_ID.to_string(),
        exp: now + ttl_secs,
        iat: Some(now),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign test token")
}

/// A `Cookie` header value carrying a valid admin session.
pub fn admin_cookie() -> String {
    session_cookie(&mint_token(TEST_JWT_SECRET, 3600))
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}", ADMIN_TOKEN_COOKIE, token)
}
