//! Rendering of [`AppError`] as HTTP responses
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and use `?` on anything that
//! converts into `AppError`.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use folio_core::{AppError, ErrorMetadata, LogLevel, UploadValidationError};
use folio_storage::StorageError;
use serde::de::DeserializeOwned;

pub use folio_infra::ErrorResponse;

/// `AppError` that renders as a JSON [`ErrorResponse`]
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<UploadValidationError> for HttpAppError {
    fn from(err: UploadValidationError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// `Json<T>` whose rejections render as 400 [`ErrorResponse`] bodies
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error.detailed_message(), error_type = error_type, "Error occurred");
        }
    }
}

pub(crate) fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details never leave the process in production or for sensitive errors
        let expose_details = !is_production_env() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, expose_details);

        (status, Json(body)).into_response()
    }
}
