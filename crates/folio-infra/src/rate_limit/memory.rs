use super::{CounterStore, RateLimitDecision, RateLimitError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const DEFAULT_SHARD_COUNT: usize = 16;
const DEFAULT_MAX_KEYS_PER_SHARD: usize = 10_000;

/// Admitted request timestamps for one key
struct SlidingWindow {
    hits: VecDeque<Instant>,
    window: Duration,
}

impl SlidingWindow {
    fn new(window: Duration) -> Self {
        Self {
            hits: VecDeque::new(),
            window,
        }
    }

    fn evict(&mut self, now: Instant) {
        while let Some(oldest) = self.hits.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }

    fn reset_after(&self, now: Instant) -> Duration {
        self.hits
            .front()
            .map(|oldest| (*oldest + self.window).saturating_duration_since(now))
            .unwrap_or(self.window)
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.hits
            .back()
            .map_or(true, |newest| now.saturating_duration_since(*newest) >= self.window)
    }
}

/// In-process counter store for a single instance and for tests.
///
/// Keys are spread over several shards, each behind its own async mutex, to reduce lock
/// contention.
#[derive(Clone)]
pub struct InMemoryCounterStore {
    shards: Vec<Arc<Mutex<HashMap<String, SlidingWindow>>>>,
    max_keys_per_shard: usize,
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCounterStore {
    /// Create a store with the default shard count (16 shards)
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARD_COUNT)
    }

    pub fn with_shards(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let shards = (0..shard_count)
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            max_keys_per_shard: DEFAULT_MAX_KEYS_PER_SHARD,
        }
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    /// Drop keys whose windows hold no live entries. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut total_cleaned = 0;

        for shard in &self.shards {
            let mut windows = shard.lock().await;
            let before = windows.len();
            windows.retain(|_, window| !window.is_expired(now));
            total_cleaned += before - windows.len();
        }

        if total_cleaned > 0 {
            tracing::debug!(
                keys_cleaned = total_cleaned,
                "Cleaned up expired rate limit windows"
            );
        }
        total_cleaned
    }

    /// Periodically drop expired windows in the background.
    pub fn spawn_cleanup(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                store.cleanup_expired().await;
            }
        })
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn hit(
        &self,
        key: &str,
        limit: u32,
        window: Duration,
    ) -> Result<RateLimitDecision, RateLimitError> {
        let now = Instant::now();
        let shard = &self.shards[self.shard_index(key)];
        let mut windows = shard.lock().await;

        if windows.len() >= self.max_keys_per_shard && !windows.contains_key(key) {
            windows.retain(|_, w| !w.is_expired(now));
            // Still full: evict the key whose latest request is oldest
            if windows.len() >= self.max_keys_per_shard {
                let stalest = windows
                    .iter()
                    .min_by_key(|(_, w)| w.hits.back().copied())
                    .map(|(k, _)| k.clone());
                if let Some(stalest) = stalest {
                    windows.remove(&stalest);
                }
            }
        }

        let entry = windows
            .entry(key.to_string())
            .or_insert_with(|| SlidingWindow::new(window));
        entry.window = window;
        entry.evict(now);

        let count = entry.hits.len() as u32;
        let allowed = count < limit;
        if allowed {
            entry.hits.push_back(now);
        }

        let used = entry.hits.len() as u32;
        Ok(RateLimitDecision {
            allowed,
            remaining: limit.saturating_sub(used),
            reset_after: entry.reset_after(now),
        })
    }
}
