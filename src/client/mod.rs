//! Client side of the valentine API, used by the bot front-end.

mod api_client;
mod error;

pub use api_client::ApiClient;
pub use error::{ApiError, ErrorKind};

use crate::domain::{Credential, NewValentine, Valentine};
use std::sync::Arc;

/// Backend operations the conversation front-end depends on.
#[async_trait::async_trait]
pub trait ValentineApi: Send + Sync {
    // ---
    /// Fetch a credential; `ApiError::NotFound` when the card does not exist.
    async fn get_credential(&self, id: i64) -> Result<Credential, ApiError>;

    /// Create a valentine; `ApiError::NotFound` when the recipient does not exist.
    async fn create_valentine(&self, valentine: &NewValentine) -> Result<Valentine, ApiError>;

    /// List a recipient's valentines. No valentines is an empty list, not an error.
    async fn list_valentines_by_recipient(
        &self,
        recipient_id: i64,
    ) -> Result<Vec<Valentine>, ApiError>;
}

/// Type alias for any backend that implements ValentineApi.
pub type ValentineApiPtr = Arc<dyn ValentineApi>;
