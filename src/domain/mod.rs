mod metrics;
mod models;
mod repository;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the storage abstractions and entities
pub use models::{Credential, NewValentine, Valentine};
pub use repository::{Repository, RepositoryPtr};
