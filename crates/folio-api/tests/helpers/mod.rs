//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p folio-api`. Storage is faked and uploads are
//! PUT to a local sink, so no S3 or Redis is needed.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod storage;

use axum_test::TestServer;
use folio_api::auth::SessionVerifier;
use folio_api::middleware::{Gatekeeper, GatekeeperLimiters};
use folio_api::setup::routes;
use folio_api::state::AppState;
use folio_api::UploadGate;
use folio_core::{Config, PortfolioConfig};
use folio_infra::{InMemoryCounterStore, SlidingWindowLimiter};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use storage::{FakeStorage, PutSink};

pub const TEST_LOGIN_PATH: &str = "/admin/login";

/// Per-IP limits for a test app: `(api_limit, login_limit)`
#[derive(Debug, Clone, Copy)]
pub struct TestLimits {
    pub api: u32,
    pub login: u32,
}

/// Test application: server plus the storage doubles behind it.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<FakeStorage>,
    pub sink: PutSink,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("ENVIRONMENT", "test"),
        ("JWT_SECRET", auth::TEST_JWT_SECRET),
        ("S3_BUCKET", "folio-test"),
        ("UPLOAD_URL_TTL_SECS", "3600"),
        ("RATE_LIMIT_BACKEND", "memory"),
        ("LOGIN_PATH", TEST_LOGIN_PATH),
    ]);
    let config = PortfolioConfig::from_vars(|key| vars.get(key).map(|v| v.to_string()))
        .expect("Failed to build test config");
    Config(Box::new(config))
}

/// Setup a test app with rate limiting disabled.
pub async fn setup_test_app() -> TestApp {
    build_test_app(None).await
}

/// Setup a test app with in-memory rate limiting.
pub async fn setup_test_app_with_limits(limits: TestLimits) -> TestApp {
    build_test_app(Some(limits)).await
}

async fn build_test_app(limits: Option<TestLimits>) -> TestApp {
    let config = test_config();
    let (sink_url, sink) = storage::spawn_put_sink().await;
    let storage = Arc::new(FakeStorage::new(sink_url));

    let limiters = limits.map(|limits| {
        let store = Arc::new(InMemoryCounterStore::new());
        GatekeeperLimiters {
            api: SlidingWindowLimiter::new(
                "api:",
                limits.api,
                Duration::from_secs(600),
                store.clone(),
            ),
            login: SlidingWindowLimiter::new(
                "login:",
                limits.login,
                Duration::from_secs(900),
                store,
            ),
        }
    });
    let gatekeeper = Arc::new(Gatekeeper::new(
        limiters,
        SessionVerifier::new(config.jwt_secret()),
        config.login_path(),
    ));

    let state = Arc::new(AppState {
        upload_gate: UploadGate::new(storage.clone(), config.upload_url_ttl()),
        http_client: reqwest::Client::new(),
        config: config.clone(),
    });

    let app = routes::setup_routes(&config, state, gatekeeper).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        sink,
    }
}
