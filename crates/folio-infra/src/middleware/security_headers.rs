use axum::http::{HeaderName, HeaderValue};
use axum::{extract::Request, middleware::Next, response::Response};
use std::sync::LazyLock;

/// Presigned uploads go straight to object storage, hence `connect-src https:`
const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; \
     style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; font-src 'self' data:; \
     connect-src 'self' https:";

/// Headers set on every response
const BASELINE_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    (
        "permissions-policy",
        "geolocation=(), microphone=(), camera=()",
    ),
];

const HSTS: (&str, &str) = (
    "strict-transport-security",
    "max-age=31536000; includeSubDomains",
);

static SERVE_HSTS: LazyLock<bool> = LazyLock::new(|| {
    ["ENVIRONMENT", "APP_ENV"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .is_some_and(|env| matches!(env.to_lowercase().as_str(), "production" | "prod"))
});

/// Adds browser hardening headers to every response. HSTS is only sent in production,
/// where the site is served over HTTPS.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let hsts = SERVE_HSTS.then_some(&HSTS);
    for &(name, value) in BASELINE_HEADERS.iter().chain(hsts) {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_security_headers_are_set() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(security_headers_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(headers["content-security-policy"]
            .to_str()
            .unwrap()
            .contains("connect-src 'self' https:"));
    }
}
