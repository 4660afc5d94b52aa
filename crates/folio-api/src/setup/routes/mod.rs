//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::constants::{API_BASE, MAX_REQUEST_BODY_BYTES};
use crate::handlers::{health, presign, session, uploads};
use crate::middleware::{
    gatekeeper_middleware, request_id_middleware, security_headers_middleware, Gatekeeper,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use folio_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

const HTTP_CONCURRENCY_LIMIT: usize = 1_024;

/// Setup all application routes
pub fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
    gatekeeper: Arc<Gatekeeper>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let app = Router::new()
        .merge(public_routes())
        .merge(upload_routes())
        .merge(admin_routes())
        .layer(axum::middleware::from_fn_with_state(
            gatekeeper,
            gatekeeper_middleware,
        ))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_credentials(false)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/live", get(health::liveness_check))
        .route(
            &format!("{}/openapi.json", API_BASE),
            get(|| async { Json(ApiDoc::openapi()) }),
        )
}

fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/project-images", API_BASE),
            post(uploads::upload_project_image),
        )
        .route(
            &format!("{}/resume-images", API_BASE),
            post(uploads::upload_resume_image).delete(uploads::delete_resume_image),
        )
        .route(
            &format!("{}/resume", API_BASE),
            post(uploads::upload_resume),
        )
        .route(
            &format!("{}/uploads/presign", API_BASE),
            post(presign::create_presigned_upload),
        )
}

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/admin/session", get(session::get_admin_session))
}
