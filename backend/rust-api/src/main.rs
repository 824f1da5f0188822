use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use philokids_api::{config::Config, create_router, services::AppState};

#[tokio::main]
async fn main() {
    let provider = init_telemetry();

    // OTLP export only when an endpoint is configured
    let otel_layer = provider.as_ref().map(|provider| {
        use opentelemetry::trace::TracerProvider as _;
        tracing_opentelemetry::layer().with_tracer(provider.tracer("philokids-api"))
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "philokids_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .init();

    tracing::info!("Starting Philosophy for Kids API");

    if let Err(e) = run().await {
        tracing::error!("Fatal: {:#}", e);
        shutdown_telemetry(provider);
        std::process::exit(1);
    }

    shutdown_telemetry(provider);
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::info!(
        "Configuration loaded for environment: {} (store: {:?})",
        config.app_env,
        config.store_backend
    );

    let bind_addr = config.bind_addr.clone();
    let app_state = Arc::new(AppState::connect(config).await?);
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

fn init_telemetry() -> Option<opentelemetry_sdk::trace::SdkTracerProvider> {
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::SdkTracerProvider;
    use opentelemetry_sdk::Resource;

    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok()?;

    let exporter = match opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(otlp_endpoint.clone())
        .build()
    {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("WARNING: OTLP exporter disabled: {}", e);
            return None;
        }
    };

    let resource = Resource::builder_empty()
        .with_service_name("philokids-api")
        .with_attributes(vec![KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        )])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());
    eprintln!("OpenTelemetry exporting to {}", otlp_endpoint);

    Some(provider)
}

fn shutdown_telemetry(provider: Option<opentelemetry_sdk::trace::SdkTracerProvider>) {
    if let Some(provider) = provider {
        tracing::info!("Shutting down OpenTelemetry");
        if let Err(e) = provider.shutdown() {
            eprintln!("OpenTelemetry shutdown failed: {}", e);
        }
    }
}
