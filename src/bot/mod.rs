//! Bot front-end runtime.
//!
//! Long-polls Telegram, maps each text message to an `Action`, runs it through
//! the conversation state machine and sends the replies back.

mod chat_queues;
mod dispatcher;
mod interpreter;
mod session_store;
mod telegram;

pub use chat_queues::ChatQueues;
pub use dispatcher::Dispatcher;
pub use interpreter::{failure_message, Outgoing};
pub use session_store::{MemorySessionStore, RedisSessionStore, SessionStore, SessionStorePtr};
pub use telegram::{TelegramClient, Update};

use crate::client::{ApiClient, ValentineApiPtr};
use crate::config::BotConfig;
use crate::conversation::{prompts, Keyboard};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Pause after a failed `getUpdates` call before polling again.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Build the session store selected by configuration.
pub fn create_session_store(config: &BotConfig) -> Result<SessionStorePtr> {
    // ---
    match &config.session_redis_url {
        Some(url) => {
            tracing::info!("Storing conversation sessions in Redis");
            Ok(Arc::new(RedisSessionStore::new(url, config.session_ttl)?))
        }
        None => {
            tracing::info!("Storing conversation sessions in memory");
            Ok(Arc::new(MemorySessionStore::new(config.session_ttl)))
        }
    }
}

/// Text messages from one polling batch, grouped per chat in arrival order.
///
/// Returns the groups and the offset acknowledging every update in the batch.
pub fn group_by_chat(updates: Vec<Update>, offset: i64) -> (BTreeMap<i64, Vec<String>>, i64) {
    // ---
    let mut next_offset = offset;
    let mut groups: BTreeMap<i64, Vec<String>> = BTreeMap::new();

    for update in updates {
        next_offset = next_offset.max(update.update_id + 1);
        if let Some(message) = update.message {
            if let Some(text) = message.text {
                groups.entry(message.chat.id).or_default().push(text);
            }
        }
    }

    (groups, next_offset)
}

/// Handle one message and deliver every reply.
async fn serve_message(
    dispatcher: &Dispatcher,
    telegram: &TelegramClient,
    chat_id: i64,
    text: String,
) {
    // ---
    let replies = match dispatcher.handle(chat_id, &text).await {
        Ok(replies) => replies,
        Err(err) => {
            tracing::error!("Failed to handle message from chat {}: {:#}", chat_id, err);
            vec![Outgoing::new(prompts::SERVICE_UNAVAILABLE, Keyboard::Main)]
        }
    };

    for reply in &replies {
        if let Err(err) = telegram.send_message(chat_id, reply).await {
            tracing::error!("Failed to reply to chat {}: {:#}", chat_id, err);
        }
    }
}

/// Poll for updates until Ctrl-C.
///
/// Every chat gets its own worker task, so polling and other chats never wait
/// on a slow backend call; each chat's own messages are handled strictly one
/// after another.
pub async fn run(config: BotConfig) -> Result<()> {
    // ---
    let api: ValentineApiPtr = Arc::new(ApiClient::new(&config.api_base_url, config.api_timeout)?);
    let sessions = create_session_store(&config)?;
    let dispatcher = Dispatcher::new(sessions.clone(), api);
    let telegram = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.token,
        config.poll_timeout,
    )?);

    let handler = {
        let telegram = telegram.clone();
        move |chat_id: i64, text: String| {
            let dispatcher = dispatcher.clone();
            let telegram = telegram.clone();
            async move { serve_message(&dispatcher, &telegram, chat_id, text).await }
        }
    };
    let mut queues = ChatQueues::new(handler, config.session_ttl);

    tracing::info!("Bot started, API at {}", config.api_base_url);

    let mut offset = 0;
    loop {
        let updates = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received, stopping bot");
                return Ok(());
            }
            result = telegram.get_updates(offset) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(err) => {
                tracing::warn!("Polling failed: {:#}", err);
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        let (groups, next_offset) = group_by_chat(updates, offset);
        offset = next_offset;

        for (chat_id, texts) in groups {
            for text in texts {
                queues.push(chat_id, text);
            }
        }

        let released = queues.release_idle();
        if released > 0 {
            tracing::debug!("Released {} idle chat workers", released);
        }

        match sessions.evict_expired().await {
            Ok(0) => {}
            Ok(evicted) => tracing::debug!("Evicted {} expired sessions", evicted),
            Err(err) => tracing::warn!("Session eviction failed: {:#}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn update(update_id: i64, chat_id: i64, text: Option<&str>) -> Update {
        // ---
        serde_json::from_value(serde_json::json!({
            "update_id": update_id,
            "message": { "chat": { "id": chat_id }, "text": text }
        }))
        .unwrap()
    }

    #[test]
    fn grouping_keeps_per_chat_order_and_advances_offset() {
        // ---
        let updates = vec![
            update(5, 1, Some("Send")),
            update(6, 2, Some("Receive")),
            update(7, 1, Some("42")),
            update(8, 2, None),
        ];

        let (groups, offset) = group_by_chat(updates, 0);

        assert_eq!(offset, 9);
        assert_eq!(groups[&1], vec!["Send".to_string(), "42".to_string()]);
        assert_eq!(groups[&2], vec!["Receive".to_string()]);
    }

    #[test]
    fn empty_batch_keeps_offset() {
        // ---
        let (groups, offset) = group_by_chat(Vec::new(), 17);

        assert!(groups.is_empty());
        assert_eq!(offset, 17);
    }
}
