//! Folio Infrastructure Library
//!
//! This crate provides shared infrastructure components used by the Folio API:
//! - Middleware (request ID, security headers)
//! - Telemetry initialization
//! - Error response format
//! - Sliding-window rate limiting (Redis and in-memory counter stores)

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

pub use error::ErrorResponse;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{
    create_counter_store, CounterStore, InMemoryCounterStore, RateLimitDecision, RateLimitError,
    SlidingWindowLimiter,
};

#[cfg(feature = "rate-limit-redis")]
pub use rate_limit::RedisCounterStore;
