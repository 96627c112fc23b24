use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use valentine_post::{create_app, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;
    let app = create_app(&config).await?;

    info!("Starting Valentine Post API v{}...", env!("CARGO_PKG_VERSION"));
    info!("Starting at endpoint:{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
