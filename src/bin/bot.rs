use anyhow::Result;
use tracing_subscriber::EnvFilter;
use valentine_post::BotConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // A missing BOT_TOKEN aborts startup here.
    let config = BotConfig::from_env()?;
    tracing::debug!("Bot configuration: {:?}", config);

    valentine_post::bot::run(config).await
}
