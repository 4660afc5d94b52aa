use crate::auth::AdminSession;
use crate::error::ErrorResponse;
use axum::{response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSessionResponse {
    pub admin_id: String,
}

/// Identity of the signed-in admin
#[utoipa::path(
    get,
    path = "/admin/session",
    tag = "session",
    responses(
        (status = 200, description = "Current admin", body = AdminSessionResponse),
        (status = 303, description = "No session; redirected to the login page"),
        (status = 401, description = "No admin session", body = ErrorResponse)
    )
)]
pub async fn get_admin_session(session: AdminSession) -> impl IntoResponse {
    Json(AdminSessionResponse {
        admin_id: session.admin_id,
    })
}
