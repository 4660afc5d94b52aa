//! Gatekeeper setup: counter store, limiters and session verifier

use crate::auth::SessionVerifier;
use crate::middleware::{Gatekeeper, GatekeeperLimiters};
use anyhow::Result;
use folio_core::Config;
use folio_infra::{create_counter_store, SlidingWindowLimiter};
use std::sync::Arc;

pub async fn setup_gatekeeper(config: &Config) -> Result<Arc<Gatekeeper>> {
    let limiters = create_counter_store(config).await?.map(|store| {
        tracing::info!(
            backend = %config.rate_limit_backend(),
            api_limit = config.api_rate_limit(),
            api_window_secs = config.api_rate_window().as_secs(),
            login_limit = config.login_rate_limit(),
            login_window_secs = config.login_rate_window().as_secs(),
            "Request rate limiting enabled"
        );
        GatekeeperLimiters {
            api: SlidingWindowLimiter::new(
                "api:",
                config.api_rate_limit(),
                config.api_rate_window(),
                store.clone(),
            ),
            login: SlidingWindowLimiter::new(
                "login:",
                config.login_rate_limit(),
                config.login_rate_window(),
                store,
            ),
        }
    });

    Ok(Arc::new(Gatekeeper::new(
        limiters,
        SessionVerifier::new(config.jwt_secret()),
        config.login_path(),
    )))
}
