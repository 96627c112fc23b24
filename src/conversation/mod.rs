//! Conversation state machine for the bot front-end.
//!
//! The design separates:
//! - **State**: where one chat is in a flow, plus its scratch data (`Session`)
//! - **Actions**: what the user did (`Action`)
//! - **Effects**: what to do about it (`Effect`)
//! - **Transition**: pure function `(Session, Action) -> (Session, Vec<Effect>)`
//!
//! Backend calls are described as effects and executed by the bot runtime.

mod action;
mod effect;
pub mod prompts;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use action::{Action, BUTTON_BACK, BUTTON_RECEIVE, BUTTON_SEND, COMMAND_START};
pub use effect::{Effect, Keyboard};
pub use state::{DialogState, Scratch, Session};
pub use transition::{
    is_track_link, transition, TransitionResult, MAX_TEXT_CHARS, MAX_TRACK_LINK_CHARS,
};
