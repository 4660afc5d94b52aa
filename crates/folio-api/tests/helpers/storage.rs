//! Storage doubles: a fake presigner and a local HTTP sink that accepts the PUTs.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::put,
    Router,
};
use folio_storage::{Storage, StorageResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A PUT received by the sink
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Objects received by [`spawn_put_sink`]
#[derive(Clone, Default)]
pub struct PutSink {
    objects: Arc<Mutex<Vec<StoredObject>>>,
}

impl PutSink {
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

async fn receive(
    State(sink): State<PutSink>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    sink.objects.lock().unwrap().push(StoredObject {
        key,
        content_type,
        size: body.len(),
    });
    StatusCode::OK
}

/// Start an HTTP server on a random local port that accepts `PUT /{*key}`.
///
/// Returns the base URL and the record of received objects.
pub async fn spawn_put_sink() -> (String, PutSink) {
    let sink = PutSink::default();
    let app = Router::new()
        .route("/{*key}", put(receive))
        .layer(axum::extract::DefaultBodyLimit::disable())
        .with_state(sink.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind PUT sink");
    let addr = listener.local_addr().expect("PUT sink has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{}", addr), sink)
}

/// Storage that presigns by pointing at a base URL and records calls.
#[derive(Default)]
pub struct FakeStorage {
    base_url: String,
    pub presigned: Mutex<Vec<(String, Duration)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FakeStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn presigned(&self) -> Vec<(String, Duration)> {
        self.presigned.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        _content_type: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.presigned
            .lock()
            .unwrap()
            .push((storage_key.to_string(), expires_in));
        Ok(format!(
            "{}/{}?X-Amz-Expires={}",
            self.base_url,
            storage_key,
            expires_in.as_secs()
        ))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deleted.lock().unwrap().push(storage_key.to_string());
        Ok(())
    }
}
