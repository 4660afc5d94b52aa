//! Server startup and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use folio_core::Config;
use std::net::SocketAddr;

/// Bind the configured port and serve until SIGINT or SIGTERM.
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        addr = %addr,
        rate_limit_backend = %config.rate_limit_backend(),
        login_path = %config.login_path(),
        upload_url_ttl_secs = config.upload_url_ttl().as_secs(),
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    folio_infra::shutdown_telemetry().await;
    Ok(())
}

/// Resolves on the first of Ctrl+C or SIGTERM.
///
/// A handler that fails to install is logged and never fires; the other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let signal = tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    };

    tracing::info!(signal, "Shutting down gracefully, draining in-flight requests");
}
