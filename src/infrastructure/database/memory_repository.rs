//! In-memory implementation of `Repository`.
//!
//! Mirrors the PostgreSQL semantics (recipient check, creation-ordered
//! listing, skip-on-conflict seeding) without a database. All data is lost
//! when the process exits.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::domain::{Credential, NewValentine, Repository, RepositoryPtr, Valentine};

#[derive(Default)]
struct Tables {
    credentials: BTreeMap<i64, String>,
    /// Kept in insertion order, which is also id order.
    valentines: Vec<Valentine>,
    next_valentine_id: i64,
}

/// In-memory repository guarded by a single `RwLock`.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    // ---
    pub fn new() -> Self {
        // ---
        Self::default()
    }
}

pub fn create_memory_repository() -> RepositoryPtr {
    // ---
    Arc::new(MemoryRepository::new())
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    // ---
    async fn get_credential(&self, id: i64) -> Result<Option<Credential>> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables
            .credentials
            .get(&id)
            .map(|password| Credential::new(id, password.clone())))
    }

    async fn count_credentials(&self) -> Result<i64> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables.credentials.len() as i64)
    }

    async fn insert_credentials(&self, credentials: &[Credential]) -> Result<u64> {
        // ---
        let mut tables = self.tables.write().await;
        let mut inserted = 0;

        for credential in credentials {
            if !tables.credentials.contains_key(&credential.id) {
                tables
                    .credentials
                    .insert(credential.id, credential.password.clone());
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn create_valentine(&self, valentine: NewValentine) -> Result<Option<Valentine>> {
        // ---
        let mut tables = self.tables.write().await;

        if !tables.credentials.contains_key(&valentine.recipient_id) {
            return Ok(None);
        }

        tables.next_valentine_id += 1;
        let stored = valentine.into_valentine(tables.next_valentine_id);
        tables.valentines.push(stored.clone());

        Ok(Some(stored))
    }

    async fn get_valentine(&self, id: i64) -> Result<Option<Valentine>> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables.valentines.iter().find(|v| v.id == id).cloned())
    }

    async fn list_valentines_by_recipient(&self, recipient_id: i64) -> Result<Vec<Valentine>> {
        // ---
        let tables = self.tables.read().await;
        Ok(tables
            .valentines
            .iter()
            .filter(|v| v.recipient_id == recipient_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
