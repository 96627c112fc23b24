//! Application state management.
//!
//! Defines the shared state passed to all Axum handlers via the `State`
//! extractor. The state is cheaply cloneable (`Arc` internally) so it can be
//! handed to each request without copying resources.

use crate::domain::{MetricsPtr, RepositoryPtr};

/// Shared application state passed to all Axum handlers.
///
/// Built once at startup and never mutated. Handlers depend on the
/// `Repository` and `Metrics` abstractions, not concrete implementations.
#[derive(Clone)]
pub(crate) struct AppState {
    /// Storage for credentials and valentines.
    repository: RepositoryPtr,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,
}

impl AppState {
    // ---

    pub fn new(repository: RepositoryPtr, metrics: MetricsPtr) -> Self {
        // ---
        AppState {
            repository,
            metrics,
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the repository implementation.
    pub(crate) fn repository(&self) -> &RepositoryPtr {
        // ---
        &self.repository
    }
}
