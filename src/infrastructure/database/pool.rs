//! PostgreSQL pool construction and schema migration.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Pause between connection attempts while the database comes up.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Connects to PostgreSQL, retrying while the server is unreachable, then
/// applies the embedded migrations.
///
/// # Errors
/// Returns the last connection error once `retry_count` attempts are exhausted,
/// or any migration failure.
pub async fn init_database_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let attempts = config.retry_count.max(1);
    let mut last_err = None;

    for attempt in 1..=attempts {
        // ---
        let result = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await;

        match result {
            Ok(pool) => {
                tracing::info!("Connected to database on attempt {}", attempt);
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("failed to run database migrations")?;
                return Ok(pool);
            }
            Err(err) => {
                tracing::warn!(
                    "Database connection attempt {}/{} failed: {}",
                    attempt,
                    attempts,
                    err
                );
                last_err = Some(err);
                if attempt < attempts {
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }

    Err(anyhow::anyhow!(
        "could not connect to database after {} attempts: {}",
        attempts,
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}
