//! Application state shared by handlers

use crate::services::UploadGate;
use folio_core::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub upload_gate: UploadGate,
    /// Client used to PUT server-received uploads to their presigned URLs
    pub http_client: reqwest::Client,
}
