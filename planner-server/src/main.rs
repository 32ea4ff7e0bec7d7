use anyhow::Result;
use tracing_subscriber::EnvFilter;

use planner_server::config::ServerConfig;
use planner_server::singleton;
use planner_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("planner_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::load()?;
    let data_dir = config.data_dir.clone();

    // Ensure only one instance uses this data directory
    let _lock = singleton::acquire_lock(&data_dir)?;

    let state = AppState::from_config(&config, &data_dir)?;
    let app = planner_server::app(state);

    let addr = config.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, data_dir = %data_dir.display(), "planner-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
