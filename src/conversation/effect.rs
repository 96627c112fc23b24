//! Effects produced by state transitions.

use crate::domain::NewValentine;

/// Reply keyboard to show alongside a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    /// `Send` / `Receive` main menu.
    Main,
    /// Single `Back` button shown inside a flow.
    Back,
    /// Leave whatever keyboard the chat currently shows.
    Keep,
}

/// Work for the runtime to perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send one message to the user.
    Reply { text: String, keyboard: Keyboard },

    /// Create the valentine and report the outcome.
    SubmitValentine(NewValentine),

    /// Authenticate against the stored credential, then list its valentines.
    FetchValentines { credential_id: i64, password: String },
}

impl Effect {
    pub fn reply(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Reply {
            text: text.into(),
            keyboard,
        }
    }
}
