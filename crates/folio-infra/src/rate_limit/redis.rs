use super::{CounterStore, RateLimitDecision, RateLimitError};
use async_trait::async_trait;
use fred::clients::RedisClient;
use fred::error::RedisError;
use fred::interfaces::{ClientLike, LuaInterface};
use fred::types::RedisConfig;
use std::time::Duration;
use uuid::Uuid;

const SLIDING_WINDOW_LUA: &str = include_str!("sliding_window.lua");

impl From<RedisError> for RateLimitError {
    fn from(err: RedisError) -> Self {
        RateLimitError::Unavailable(err.to_string())
    }
}

/// Counter store backed by Redis sorted sets.
///
/// Each key is a sorted set of admitted request ids scored by Redis server time in
/// milliseconds. The whole check-and-record step runs as one Lua script, so instances
/// sharing a Redis see one consistent window.
#[derive(Clone)]
pub struct RedisCounterStore {
    client: RedisClient,
}

impl RedisCounterStore {
    pub async fn connect(url: &str) -> Result<Self, RateLimitError> {
        let client = RedisClient::new(RedisConfig::from_url(url)?, None, None, None);
        client.init().await?;
        Ok(Self { client })
    }

    pub fn from_client(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn hit(
        &self,
        key: &str,
        limit: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let window_ms = window.as_millis().max(1) as i64;
        let args = vec![
            limit.to_string(),
            window_ms.to_string(),
            Uuid::new_v4().to_string(),
        ];

        let reply: Vec<i64> = self
            .client
            .eval(SLIDING_WINDOW_LUA, vec![key.to_string()], args)
            .await?;

        match reply.as_slice() {
            [allowed, remaining, reset_ms] => Ok(RateLimitDecision {
                allowed: *allowed == 1,
                remaining: (*remaining).max(0) as u32,
                reset_after: Duration::from_millis((*reset_ms).max(0) as u64),
            }),
            other => Err(RateLimitError::InvalidResponse(format!(
                "expected 3 integers, got {:?}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a running Redis at REDIS_URL"]
    async fn test_redis_sliding_window() {
        dotenvy::dotenv().ok();
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into());
        let store = RedisCounterStore::connect(&url).await.unwrap();
        let key = format!("test:{}", Uuid::new_v4());
        let window = Duration::from_secs(2);

        for expected_remaining in (0..3).rev() {
            let decision = store.hit(&key, 3, window).await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected_remaining);
        }

        let decision = store.hit(&key, 3, window).await.unwrap();
        assert!(!decision.allowed);
        assert!(decision.reset_after <= window);

        tokio::time::sleep(window + Duration::from_millis(100)).await;
        assert!(store.hit(&key, 3, window).await.unwrap().allowed);
    }
}
