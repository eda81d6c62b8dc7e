// crates/server/src/main.rs
use anyhow::Context;
use blueprint_server::{create_app, AppState, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    tracing::info!(
        port = config.port,
        max_jobs = config.max_jobs,
        expiry_minutes = config.job_expiry.num_minutes(),
        "Starting blueprint server"
    );

    let state = AppState::new(&config);
    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("Listening on http://{addr}");
    tracing::info!("API available at http://{addr}/api");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
