//! Application setup: telemetry, storage, the gatekeeper and the router.

pub mod gatekeeper;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::UploadGate;
use crate::state::AppState;
use anyhow::{Context, Result};
use folio_core::Config;
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    folio_infra::init_telemetry("folio-api", config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let gatekeeper = gatekeeper::setup_gatekeeper(&config).await?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(crate::constants::STORAGE_PUT_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")?;

    let state = Arc::new(AppState {
        upload_gate: UploadGate::new(storage, config.upload_url_ttl()),
        http_client,
        config: config.clone(),
    });

    let router = routes::setup_routes(&config, state.clone(), gatekeeper)?;

    Ok((state, router))
}
