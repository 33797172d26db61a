use coursechat::api::{self, app_state::AppState};
use coursechat::config::loader::ConfigLoader;
use coursechat::observability::{
    AppMetrics, ObservabilityState, create_observability_router, init_tracing,
};
use coursechat::storage::StorageFactory;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;

    let _guard = init_tracing(&config.logging);
    info!(
        environment = %config.environment,
        backend = ?config.database.backend,
        "Starting Coursechat..."
    );

    let storage = StorageFactory::create(&config.database).await?;
    info!("Storage initialized: {}", storage.backend_name());

    let metrics = Arc::new(AppMetrics::new()?);
    let app_state = AppState::from_storage(&storage, &config, metrics.clone());
    info!(
        window_size = config.memory.window_size,
        "Application state created"
    );

    let observability_state = Arc::new(ObservabilityState::new(
        metrics,
        storage,
        env!("CARGO_PKG_VERSION").to_string(),
    ));
    let router = create_observability_router(observability_state).merge(api::create_router(app_state));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
