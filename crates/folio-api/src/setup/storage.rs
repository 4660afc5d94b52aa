//! Storage setup and initialization

use anyhow::Result;
use folio_core::Config;
use folio_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config).await?;
    tracing::info!(
        upload_url_ttl_secs = config.upload_url_ttl().as_secs(),
        "Storage initialized successfully"
    );
    Ok(storage)
}
