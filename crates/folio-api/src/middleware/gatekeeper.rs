//! Request gatekeeper
//!
//! Runs in front of every route. Throttles `/api` traffic and login attempts per caller IP,
//! then resolves the admin session cookie and keeps anonymous callers out of `/admin` pages.
//!
//! Rate limiting fails open (disabled limiters or an unreachable counter store let the
//! request through); the admin page check fails closed.

use crate::auth::{AdminSession, SessionVerifier, ADMIN_TOKEN_COOKIE};
use crate::error::HttpAppError;
use crate::utils::cookies::cookie_value;
use crate::utils::ip_extraction::extract_client_ip;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use folio_core::AppError;
use folio_infra::{RateLimitDecision, SlidingWindowLimiter};
use std::sync::Arc;

const API_PREFIX: &str = "/api";
const ADMIN_PREFIX: &str = "/admin";
const LOGIN_THROTTLED_MESSAGE: &str = "Too many login attempts. Try again later.";

/// The two route-class limiters, present only when rate limiting is enabled
#[derive(Clone)]
pub struct GatekeeperLimiters {
    pub api: SlidingWindowLimiter,
    pub login: SlidingWindowLimiter,
}

#[derive(Clone)]
pub struct Gatekeeper {
    limiters: Option<GatekeeperLimiters>,
    verifier: SessionVerifier,
    login_path: String,
}

impl Gatekeeper {
    pub fn new(
        limiters: Option<GatekeeperLimiters>,
        verifier: SessionVerifier,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            limiters,
            verifier,
            login_path: login_path.into(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    fn is_protected_page(&self, path: &str) -> bool {
        path_has_prefix(path, ADMIN_PREFIX) && path != self.login_path
    }

    fn session_from_headers(&self, headers: &HeaderMap) -> Option<AdminSession> {
        let token = cookie_value(headers, ADMIN_TOKEN_COOKIE)?;
        self.verifier.verify(&token).ok().map(|claims| AdminSession {
            admin_id: claims.admin_id,
        })
    }
}

/// `/api` and `/api/...` match; `/apiary` does not.
fn path_has_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Run a limiter, treating counter store failures as admission.
async fn admit(limiter: &SlidingWindowLimiter, ip: &str) -> Option<RateLimitDecision> {
    match limiter.check(ip).await {
        Ok(decision) => Some(decision),
        Err(e) => {
            tracing::error!(error = %e, ip = %ip, "Rate limit check failed; allowing request");
            None
        }
    }
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: impl ToString) {
    if let Ok(header_value) = HeaderValue::from_str(&value.to_string()) {
        headers.insert(name, header_value);
    }
}

fn retry_after_secs(decision: &RateLimitDecision) -> u64 {
    // Round up so clients never retry before the window has moved
    let secs = decision.reset_after.as_secs();
    let secs = if decision.reset_after.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    };
    secs.max(1)
}

fn throttled(body: Response, limit: u32, decision: &RateLimitDecision) -> Response {
    let mut response = body;
    *response.status_mut() = StatusCode::TOO_MANY_REQUESTS;
    let headers = response.headers_mut();
    insert_header(headers, "Retry-After", retry_after_secs(decision));
    insert_header(headers, "X-RateLimit-Limit", limit);
    insert_header(headers, "X-RateLimit-Remaining", 0);
    response
}

/// Gatekeeper middleware
///
/// In order:
/// 1. resolve the caller IP from proxy headers;
/// 2. `/api/*`: general rate limit, plain-text 429 when exceeded;
/// 3. `POST` to the login path: login rate limit, JSON 429 when exceeded;
/// 4. verify the `admin-token` cookie and store [`AdminSession`] in extensions;
/// 5. `/admin/*` other than the login path without a session: 303 to the login path.
pub async fn gatekeeper_middleware(
    State(gatekeeper): State<Arc<Gatekeeper>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let ip = extract_client_ip(request.headers());

    let mut api_decision = None;
    if let Some(limiters) = &gatekeeper.limiters {
        if path_has_prefix(&path, API_PREFIX) {
            if let Some(decision) = admit(&limiters.api, &ip).await {
                if !decision.allowed {
                    return throttled(
                        "Too Many Requests".into_response(),
                        limiters.api.limit(),
                        &decision,
                    );
                }
                api_decision = Some((limiters.api.limit(), decision));
            }
        }

        if path == gatekeeper.login_path && request.method() == Method::POST {
            if let Some(decision) = admit(&limiters.login, &ip).await {
                if !decision.allowed {
                    return throttled(
                        HttpAppError(AppError::TooManyRequests(
                            LOGIN_THROTTLED_MESSAGE.to_string(),
                        ))
                        .into_response(),
                        limiters.login.limit(),
                        &decision,
                    );
                }
            }
        }
    }

    let session = gatekeeper.session_from_headers(request.headers());

    if gatekeeper.is_protected_page(&path) && session.is_none() {
        tracing::debug!(path = %path, "Redirecting anonymous request to login");
        return Redirect::to(&gatekeeper.login_path).into_response();
    }

    if let Some(session) = session {
        request.extensions_mut().insert(session);
    }

    let mut response = next.run(request).await;

    if let Some((limit, decision)) = api_decision {
        let headers = response.headers_mut();
        insert_header(headers, "X-RateLimit-Limit", limit);
        insert_header(headers, "X-RateLimit-Remaining", decision.remaining);
    }

    response
}
