use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_telemetry_api::handlers::AppState;
use vehicle_telemetry_api::locks::KeyedMutex;
use vehicle_telemetry_api::repositories::{
    OutboxRepository, ThermometerRepository, TrackablesRepository,
};
use vehicle_telemetry_api::services::{
    HttpDriverDirectory, KafkaEventSink, OutboxPublisher, TelemetryIngestService,
    ThermometerResolver,
};
use vehicle_telemetry_api::{create_pool, routes, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vehicle_telemetry_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting vehicle-telemetry-api");

    // Load configuration
    let config = Config::from_env()?;

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let pool = create_pool(&config).await?;
    tracing::info!("Database connection established");

    // Wire repositories and services
    let locks = KeyedMutex::new();
    let trackables = TrackablesRepository::new(pool.clone());
    let thermometers = ThermometerRepository::new(pool.clone());
    let resolver = Arc::new(ThermometerResolver::new(
        thermometers.clone(),
        trackables.clone(),
        locks.clone(),
    ));
    let drivers = Arc::new(HttpDriverDirectory::new(&config.driver_service)?);
    let ingest = Arc::new(TelemetryIngestService::new(pool.clone(), drivers, locks));

    // Spawn the outbox publisher
    let sink = Arc::new(KafkaEventSink::new(&config.kafka)?);
    let publisher = OutboxPublisher::new(
        OutboxRepository::new(pool.clone()),
        sink,
        config.outbox.poll_interval_secs,
        config.outbox.batch_size,
    );
    let publisher_handle = tokio::spawn(publisher.run());

    // Create API server
    let state = AppState {
        pool,
        trackables,
        thermometers,
        resolver,
        ingest,
    };
    let app = routes::create_router(state);

    let bind_addr = config.bind_address();
    tracing::info!("Starting API server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    publisher_handle.abort();

    tracing::info!("Application shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
