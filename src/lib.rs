// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use handlers::{
    create_valentine, get_credential, get_valentine, health_check, list_valentines_by_recipient,
    metrics_handler, root_handler, track_requests,
};

// Public exports (visible outside this module)
pub mod bot;
pub mod client;
pub mod conversation;
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;

pub use config::*;
pub use handlers::ErrorBody;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_repository, // ---
    create_noop_metrics,
    create_postgres_repository,
    create_prom_metrics,
    init_database_with_retry,
    load_credentials_from_file,
    parse_credentials,
};

use domain::{MetricsPtr, RepositoryPtr};

/// Build the HTTP router over the given storage and metrics backends.
pub fn create_router(repository: RepositoryPtr, metrics: MetricsPtr) -> Router {
    // ---
    let app_state = AppState::new(repository, metrics);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/credentials/{id}", get(get_credential))
        .route("/valentines", post(create_valentine))
        .route("/valentines/{id}", get(get_valentine))
        .route(
            "/valentines/recipient/{id}",
            get(list_valentines_by_recipient),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_requests,
        ))
        .with_state(app_state)
}

/// Wire up PostgreSQL, seed credentials and build the router from configuration.
///
/// # Errors
/// Fails if the database stays unreachable, migrations fail, the seed file
/// cannot be read, or the metrics recorder cannot be installed.
pub async fn create_app(config: &ServerConfig) -> Result<Router> {
    // ---
    let metrics = if config.metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    let pool = init_database_with_retry(&config.database).await?;
    let repository = create_postgres_repository(pool);

    load_credentials_from_file(repository.as_ref(), &config.credentials_path).await?;

    Ok(create_router(repository, metrics))
}
