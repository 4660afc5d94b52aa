use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "folio=debug,tower_http=debug";

/// Initialize structured tracing for the process.
///
/// `RUST_LOG` overrides the default filter. Production emits JSON lines.
pub fn init_telemetry(
    service_name: &str,
    environment: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = matches!(environment.to_lowercase().as_str(), "production" | "prod");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    tracing::info!(
        service = service_name,
        environment = environment,
        "Tracing initialized"
    );
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
