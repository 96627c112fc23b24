// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod credentials;
mod health;
mod metrics;
mod root;
mod shared_types;
mod valentines;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, track_requests};
pub use root::root_handler;

// Credential and valentine handlers
pub use credentials::get_credential;
pub use valentines::{create_valentine, get_valentine, list_valentines_by_recipient};

pub use shared_types::ErrorBody;
