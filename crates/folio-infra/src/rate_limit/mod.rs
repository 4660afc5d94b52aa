//! Sliding-window rate limiting
//!
//! A [`CounterStore`] keeps, per key, the timestamps of admitted requests inside a trailing
//! window. [`SlidingWindowLimiter`] binds a store to a key prefix, a limit and a window.

mod memory;
#[cfg(feature = "rate-limit-redis")]
mod redis;

pub use memory::InMemoryCounterStore;
#[cfg(feature = "rate-limit-redis")]
pub use redis::RedisCounterStore;

use async_trait::async_trait;
use folio_core::{Config, RateLimitBackend};
use std::sync::Arc;
use std::time::Duration;

const MEMORY_CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Outcome of one admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests still admissible in the current window
    pub remaining: u32,
    /// Time until the oldest admitted request leaves the window
    pub reset_after: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Counter store unavailable: {0}")]
    Unavailable(String),

    #[error("Counter store returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Storage for sliding-window counters.
///
/// `hit` must evict entries older than `now - window`, count what is left, and record the
/// current request only when the count is below `limit`, all as one atomic step. Rejected
/// requests are never recorded.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn hit(
        &self,
        key: &str,
        limit: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError>;
}

/// Rate limiter for one route class (e.g. `api:` or `login:`)
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    prefix: String,
    limit: u32,
    window: Duration,
    store: Arc<dyn CounterStore>,
}

impl SlidingWindowLimiter {
    pub fn new(
        prefix: impl Into<String>,
        limit: u32,
        window: Duration,
        store: Arc<dyn CounterStore>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            limit,
            window,
            store,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record one request from `identifier` (usually a client IP) if it fits the window.
    pub async fn check(&self, identifier: &str) -> Result<RateLimitDecision, RateLimitError> {
        let key = format!("{}{}", self.prefix, identifier);
        let decision = self.store.hit(&key, self.limit, self.window).await?;

        if !decision.allowed {
            tracing::warn!(
                key = %key,
                limit = self.limit,
                window_secs = self.window.as_secs(),
                retry_after_secs = decision.reset_after.as_secs(),
                "Rate limit exceeded"
            );
        }

        Ok(decision)
    }
}

/// Create the counter store selected by configuration, or `None` when rate limiting is off.
pub async fn create_counter_store(
    config: &Config,
) -> Result<Option<Arc<dyn CounterStore>>, anyhow::Error> {
    match config.rate_limit_backend() {
        RateLimitBackend::Disabled => {
            tracing::warn!("Rate limiting disabled: requests will not be throttled");
            Ok(None)
        }
        RateLimitBackend::Memory => {
            let store = InMemoryCounterStore::new();
            store.spawn_cleanup(MEMORY_CLEANUP_INTERVAL);
            tracing::info!("Using in-memory rate limit counters");
            Ok(Some(Arc::new(store)))
        }
        #[cfg(feature = "rate-limit-redis")]
        RateLimitBackend::Redis => {
            let url = config
                .redis_url()
                .ok_or_else(|| anyhow::anyhow!("REDIS_URL not configured"))?;
            let store = RedisCounterStore::connect(url).await?;
            tracing::info!("Using Redis rate limit counters");
            Ok(Some(Arc::new(store)))
        }
        #[cfg(not(feature = "rate-limit-redis"))]
        RateLimitBackend::Redis => Err(anyhow::anyhow!(
            "Redis rate limit backend not available (rate-limit-redis feature not enabled)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limiter_prefixes_keys() {
        let store = Arc::new(InMemoryCounterStore::new());
        let api = SlidingWindowLimiter::new("api:", 1, Duration::from_secs(60), store.clone());
        let login = SlidingWindowLimiter::new("login:", 1, Duration::from_secs(60), store);

        assert!(api.check("10.0.0.1").await.unwrap().allowed);
        assert!(!api.check("10.0.0.1").await.unwrap().allowed);
        // Separate namespace on the same store
        assert!(login.check("10.0.0.1").await.unwrap().allowed);
        // Separate caller
        assert!(api.check("10.0.0.2").await.unwrap().allowed);
    }
}
