//! Conversation state types.

use serde::{Deserialize, Serialize};

/// Position of a chat within the send or receive flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// Main menu; no flow in progress.
    #[default]
    Idle,
    /// Waiting for the recipient's card number.
    SendingCard,
    /// Waiting for the message text.
    SendingText,
    /// Waiting for the track link; submitting follows.
    SendingTrack,
    /// Waiting for the reader's card number.
    GettingId,
    /// Waiting for the card password; authentication and listing follow.
    GettingPassword,
}

impl DialogState {
    pub fn is_idle(self) -> bool {
        self == DialogState::Idle
    }
}

/// Fields accumulated during the current flow. Never persisted by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scratch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<i64>,
}

impl Scratch {
    pub fn is_empty(&self) -> bool {
        *self == Scratch::default()
    }
}

/// Everything the bot remembers about one chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub state: DialogState,
    #[serde(default)]
    pub scratch: Scratch,
}

impl Session {
    // ---
    pub fn new(state: DialogState, scratch: Scratch) -> Self {
        Self { state, scratch }
    }

    /// `Idle` with empty scratch data.
    pub fn idle() -> Self {
        Self::default()
    }
}
