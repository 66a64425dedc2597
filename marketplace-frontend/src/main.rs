use dotenvy::dotenv;
use marketplace_core::observability::{logging::init_tracing, metrics::init_metrics};
use marketplace_frontend::config::get_configuration;
use marketplace_frontend::services::AuthClient;
use marketplace_frontend::session::FileStorage;
use marketplace_frontend::startup::build_router;
use marketplace_frontend::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "marketplace-frontend",
        &configuration.observability.log_level,
        configuration.observability.otlp_endpoint.as_deref(),
    );
    init_metrics();

    let storage = Arc::new(FileStorage::new(configuration.storage.path.clone()));
    let auth_client = Arc::new(AuthClient::new(&configuration.api)?);
    let state = AppState::new(&configuration.api, storage, auth_client)?;

    // Pages render a loading state until the persisted session is restored.
    let session = state.session.clone();
    tokio::spawn(async move {
        session.hydrate().await;
    });

    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!(
        api = %configuration.api.base_url,
        "Starting marketplace-frontend on {}", address
    );
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
