//! Routes one chat message through the state machine and its effects.

use super::interpreter::{self, Outgoing};
use super::session_store::SessionStorePtr;
use crate::client::ValentineApiPtr;
use crate::conversation::{transition, Action, TransitionResult};
use anyhow::Result;

/// Ties session storage, the pure transition function and the API together.
///
/// Callers must not run two `handle` calls for the same chat concurrently;
/// different chats are independent.
#[derive(Clone)]
pub struct Dispatcher {
    sessions: SessionStorePtr,
    api: ValentineApiPtr,
}

impl Dispatcher {
    // ---
    pub fn new(sessions: SessionStorePtr, api: ValentineApiPtr) -> Self {
        // ---
        Self { sessions, api }
    }

    /// Process one text message from `chat_id` and return the replies.
    ///
    /// The new session is stored before any backend call, so a terminal step
    /// leaves the chat `Idle` whatever the backend answers.
    ///
    /// # Errors
    /// Only session storage failures are returned; API failures are turned
    /// into reply messages.
    pub async fn handle(&self, chat_id: i64, text: &str) -> Result<Vec<Outgoing>> {
        // ---
        let session = self.sessions.load(chat_id).await?.unwrap_or_default();
        let action = Action::parse(text);
        tracing::debug!("Chat {} in {:?} got {}", chat_id, session.state, action_name(&action));

        let TransitionResult { session: next, effects } = transition(&session, action);
        self.sessions.save(chat_id, &next).await?;

        let mut replies = Vec::new();
        for effect in effects {
            replies.extend(interpreter::execute(self.api.as_ref(), effect).await);
        }

        Ok(replies)
    }
}

/// Action label for logs; free text may hold a password.
fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Start => "start",
        Action::Back => "back",
        Action::SelectSend => "select_send",
        Action::SelectReceive => "select_receive",
        Action::TextInput(_) => "text_input",
    }
}
