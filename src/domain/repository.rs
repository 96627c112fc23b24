use super::models::{Credential, NewValentine, Valentine};
use anyhow::Result;
use std::sync::Arc;

/// Abstraction over credential and valentine persistence.
///
/// Each method is one logical store transaction. `Ok(None)` means the
/// addressed record does not exist; `Err` is reserved for storage failures.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Get a credential by card number.
    async fn get_credential(&self, id: i64) -> Result<Option<Credential>>;

    /// Number of stored credentials.
    async fn count_credentials(&self) -> Result<i64>;

    /// Insert credentials, skipping ids that already exist. Returns the number inserted.
    async fn insert_credentials(&self, credentials: &[Credential]) -> Result<u64>;

    /// Persist a valentine if its recipient exists.
    ///
    /// Returns `Ok(None)` without writing anything when the recipient is unknown.
    async fn create_valentine(&self, valentine: NewValentine) -> Result<Option<Valentine>>;

    /// Get a valentine by its id.
    async fn get_valentine(&self, id: i64) -> Result<Option<Valentine>>;

    /// All valentines addressed to `recipient_id`, in creation order.
    async fn list_valentines_by_recipient(&self, recipient_id: i64) -> Result<Vec<Valentine>>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<()>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
