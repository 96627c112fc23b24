//! Per-chat conversation storage.
//!
//! Sessions expire after a configurable period of inactivity; an expired or
//! missing session reads as `None` and the caller starts from `Idle`.

use crate::conversation::Session;
use anyhow::Result;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Storage for conversation sessions keyed by chat id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    // ---
    /// Load the live session for a chat.
    async fn load(&self, chat_id: i64) -> Result<Option<Session>>;

    /// Store a chat's session and restart its expiry clock.
    async fn save(&self, chat_id: i64, session: &Session) -> Result<()>;

    /// Drop sessions whose TTL has passed. Returns how many were removed.
    async fn evict_expired(&self) -> Result<usize>;
}

/// Type alias for any backend that implements SessionStore.
pub type SessionStorePtr = Arc<dyn SessionStore>;

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local session store.
pub struct MemorySessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<i64, (Session, Instant)>>,
}

impl MemorySessionStore {
    // ---
    pub fn new(ttl: Duration) -> Self {
        // ---
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    // ---
    async fn load(&self, chat_id: i64) -> Result<Option<Session>> {
        // ---
        let mut sessions = self.sessions.lock().await;

        match sessions.get(&chat_id) {
            Some((_, touched)) if touched.elapsed() >= self.ttl => {
                tracing::debug!("Session for chat {} expired", chat_id);
                sessions.remove(&chat_id);
                Ok(None)
            }
            Some((session, _)) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    async fn save(&self, chat_id: i64, session: &Session) -> Result<()> {
        // ---
        let mut sessions = self.sessions.lock().await;

        // Idle with no scratch is what a missing entry means anyway.
        if *session == Session::idle() {
            sessions.remove(&chat_id);
        } else {
            sessions.insert(chat_id, (session.clone(), Instant::now()));
        }

        Ok(())
    }

    async fn evict_expired(&self) -> Result<usize> {
        // ---
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, (_, touched)| touched.elapsed() < self.ttl);

        Ok(before - sessions.len())
    }
}

// ============================================================================
// Redis store
// ============================================================================

/// Session data stored in Redis.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    session: Session,
    /// Unix seconds of the last save.
    updated_at: i64,
}

impl StoredSession {
    /// Seconds since the last save, as of `now`.
    fn age_secs(&self, now: i64) -> i64 {
        (now - self.updated_at).max(0)
    }

    /// Keys written under a longer TTL outlive a shortened one; the saved
    /// timestamp enforces the current TTL.
    fn is_live(&self, now: i64, ttl: Duration) -> bool {
        u64::try_from(self.age_secs(now)).unwrap_or_default() < ttl.as_secs().max(1)
    }
}

/// Redis-backed store; expiry is delegated to key TTLs.
pub struct RedisSessionStore {
    client: redis::Client,
    ttl: Duration,
}

impl RedisSessionStore {
    // ---
    /// # Errors
    /// Fails if the URL cannot be parsed. No connection is made here.
    pub fn new(url: &str, ttl: Duration) -> Result<Self> {
        // ---
        Ok(Self {
            client: redis::Client::open(url)?,
            ttl,
        })
    }

    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                tracing::error!("Failed to connect to Redis: {:?}", err);
                err.into()
            })
    }

    fn key(chat_id: i64) -> String {
        format!("valentine:session:{chat_id}")
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    // ---
    async fn load(&self, chat_id: i64) -> Result<Option<Session>> {
        // ---
        let mut conn = self.get_conn().await?;
        let raw: Option<String> = conn.get(Self::key(chat_id)).await?;

        match raw {
            Some(json) => match serde_json::from_str::<StoredSession>(&json) {
                Ok(stored) => {
                    let now = chrono::Utc::now().timestamp();
                    if !stored.is_live(now, self.ttl) {
                        tracing::debug!(
                            "Session for chat {} expired {}s after its last save",
                            chat_id,
                            stored.age_secs(now)
                        );
                        return Ok(None);
                    }
                    tracing::debug!(
                        "Resuming session for chat {} saved {}s ago",
                        chat_id,
                        stored.age_secs(now)
                    );
                    Ok(Some(stored.session))
                }
                Err(err) => {
                    tracing::warn!("Discarding unreadable session for chat {}: {}", chat_id, err);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn save(&self, chat_id: i64, session: &Session) -> Result<()> {
        // ---
        let mut conn = self.get_conn().await?;
        let key = Self::key(chat_id);

        if *session == Session::idle() {
            conn.del::<_, ()>(&key).await?;
            return Ok(());
        }

        let stored = StoredSession {
            session: session.clone(),
            updated_at: chrono::Utc::now().timestamp(),
        };
        let json = serde_json::to_string(&stored)?;
        conn.set_ex::<_, _, ()>(&key, json, self.ttl.as_secs().max(1))
            .await?;

        Ok(())
    }

    async fn evict_expired(&self) -> Result<usize> {
        // Redis drops expired keys itself.
        Ok(0)
    }
}
