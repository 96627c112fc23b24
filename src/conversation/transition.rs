//! Pure state transition function.
//!
//! Given the same session and action this always produces the same result;
//! backend calls are returned as effects, never performed here.

use super::prompts;
use super::{Action, DialogState, Effect, Keyboard, Scratch, Session};
use crate::domain::NewValentine;
use once_cell::sync::Lazy;
use regex::Regex;

/// An http(s) scheme, any letter case, followed by at least one non-space character.
static TRACK_LINK: Lazy<Regex> = Lazy::new(|| {
    // ---
    Regex::new(r"(?i)^https?://\S").expect("track link pattern is valid")
});

/// Longest valentine text accepted, in characters.
///
/// Text, a newline and the longest link still fit one chat message.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Longest track link accepted, in characters. Matches the storage column.
pub const MAX_TRACK_LINK_CHARS: usize = 2048;

/// Whether `input` (after trimming) is acceptable as a track link.
pub fn is_track_link(input: &str) -> bool {
    TRACK_LINK.is_match(input.trim())
}

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// Session to store for the chat.
    pub session: Session,
    /// Effects to execute, in order.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    // ---
    fn reply(session: Session, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            session,
            effects: vec![Effect::reply(text, keyboard)],
        }
    }

    /// Back to the main menu with scratch data discarded.
    fn reset(text: impl Into<String>) -> Self {
        Self::reply(Session::idle(), text, Keyboard::Main)
    }
}

/// Pure transition function.
pub fn transition(session: &Session, action: Action) -> TransitionResult {
    // ---
    match action {
        Action::Start => TransitionResult::reset(prompts::GREETING),
        Action::Back => TransitionResult::reset(prompts::BACK_TO_MENU),

        // Menu buttons restart their flow from any state.
        Action::SelectSend => TransitionResult::reply(
            Session::new(DialogState::SendingCard, Scratch::default()),
            prompts::ASK_CARD,
            Keyboard::Back,
        ),
        Action::SelectReceive => TransitionResult::reply(
            Session::new(DialogState::GettingId, Scratch::default()),
            prompts::ASK_ID,
            Keyboard::Back,
        ),

        Action::TextInput(input) => on_input(session, &input),
    }
}

fn on_input(session: &Session, input: &str) -> TransitionResult {
    // ---
    let input = input.trim();

    match session.state {
        DialogState::Idle => {
            TransitionResult::reply(session.clone(), prompts::MENU_HINT, Keyboard::Main)
        }

        // =====================================================================
        // Send flow
        // =====================================================================
        DialogState::SendingCard => match input.parse::<i64>() {
            Ok(recipient_id) => {
                let mut next = session.clone();
                next.state = DialogState::SendingText;
                next.scratch.recipient_id = Some(recipient_id);
                TransitionResult::reply(next, prompts::ASK_TEXT, Keyboard::Back)
            }
            Err(_) => {
                TransitionResult::reply(session.clone(), prompts::ASK_CARD_AGAIN, Keyboard::Back)
            }
        },

        DialogState::SendingText => {
            if input.chars().count() > MAX_TEXT_CHARS {
                return TransitionResult::reply(
                    session.clone(),
                    prompts::text_too_long(MAX_TEXT_CHARS),
                    Keyboard::Back,
                );
            }

            let mut next = session.clone();
            next.state = DialogState::SendingTrack;
            next.scratch.text = Some(input.to_string());
            TransitionResult::reply(next, prompts::ASK_TRACK, Keyboard::Back)
        }

        DialogState::SendingTrack => {
            if !is_track_link(input) {
                return TransitionResult::reply(
                    session.clone(),
                    prompts::ASK_TRACK_AGAIN,
                    Keyboard::Back,
                );
            }
            if input.chars().count() > MAX_TRACK_LINK_CHARS {
                return TransitionResult::reply(
                    session.clone(),
                    prompts::track_link_too_long(MAX_TRACK_LINK_CHARS),
                    Keyboard::Back,
                );
            }

            let Scratch {
                recipient_id: Some(recipient_id),
                text: Some(text),
                ..
            } = &session.scratch
            else {
                tracing::warn!("Send flow reached the track step without its earlier fields");
                return TransitionResult::reset(prompts::BACK_TO_MENU);
            };

            TransitionResult {
                session: Session::idle(),
                effects: vec![Effect::SubmitValentine(NewValentine::new(
                    text.clone(),
                    input,
                    *recipient_id,
                ))],
            }
        }

        // =====================================================================
        // Receive flow
        // =====================================================================
        DialogState::GettingId => match input.parse::<i64>() {
            Ok(credential_id) => {
                let mut next = session.clone();
                next.state = DialogState::GettingPassword;
                next.scratch.credential_id = Some(credential_id);
                TransitionResult::reply(next, prompts::ASK_PASSWORD, Keyboard::Back)
            }
            Err(_) => {
                TransitionResult::reply(session.clone(), prompts::ASK_ID_AGAIN, Keyboard::Back)
            }
        },

        DialogState::GettingPassword => {
            let Some(credential_id) = session.scratch.credential_id else {
                tracing::warn!("Receive flow reached the password step without an id");
                return TransitionResult::reset(prompts::BACK_TO_MENU);
            };

            TransitionResult {
                session: Session::idle(),
                effects: vec![Effect::FetchValentines {
                    credential_id,
                    password: input.to_string(),
                }],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn text(s: &str) -> Action {
        Action::TextInput(s.to_string())
    }

    /// Feed actions one by one, returning the final result.
    fn run(actions: Vec<Action>) -> TransitionResult {
        // ---
        let mut session = Session::idle();
        let mut last = None;
        for action in actions {
            let result = transition(&session, action);
            session = result.session.clone();
            last = Some(result);
        }
        last.expect("at least one action")
    }

    #[test]
    fn start_greets_with_main_menu() {
        // ---
        let result = transition(&Session::idle(), Action::Start);

        assert_eq!(result.session, Session::idle());
        assert_eq!(
            result.effects,
            vec![Effect::reply(prompts::GREETING, Keyboard::Main)]
        );
    }

    #[test]
    fn send_flow_accumulates_and_submits() {
        // ---
        let result = run(vec![
            Action::SelectSend,
            text(" 42 "),
            text("  hi  "),
            text(" https://example.com/song "),
        ]);

        assert_eq!(result.session, Session::idle());
        assert_eq!(
            result.effects,
            vec![Effect::SubmitValentine(NewValentine::new(
                "hi",
                "https://example.com/song",
                42
            ))]
        );
    }

    #[test]
    fn send_flow_intermediate_states() {
        // ---
        let after_card = run(vec![Action::SelectSend, text("42")]);
        assert_eq!(after_card.session.state, DialogState::SendingText);
        assert_eq!(after_card.session.scratch.recipient_id, Some(42));

        let after_text = run(vec![Action::SelectSend, text("42"), text("hello")]);
        assert_eq!(after_text.session.state, DialogState::SendingTrack);
        assert_eq!(after_text.session.scratch.text.as_deref(), Some("hello"));
        assert_eq!(
            after_text.effects,
            vec![Effect::reply(prompts::ASK_TRACK, Keyboard::Back)]
        );
    }

    #[test]
    fn empty_text_is_accepted() {
        // ---
        let result = run(vec![Action::SelectSend, text("1"), text("   ")]);

        assert_eq!(result.session.state, DialogState::SendingTrack);
        assert_eq!(result.session.scratch.text.as_deref(), Some(""));
    }

    #[test]
    fn non_numeric_card_reprompts() {
        // ---
        let before = run(vec![Action::SelectSend]).session;
        let result = transition(&before, text("forty-two"));

        assert_eq!(result.session, before);
        assert_eq!(
            result.effects,
            vec![Effect::reply(prompts::ASK_CARD_AGAIN, Keyboard::Back)]
        );
    }

    #[test]
    fn bad_track_link_keeps_scratch() {
        // ---
        let before = run(vec![Action::SelectSend, text("42"), text("hi")]).session;

        for link in ["ftp://example.com", "example.com", "http:/x", "https://", ""] {
            let result = transition(&before, text(link));
            assert_eq!(result.session, before, "link {link:?}");
            assert_eq!(
                result.effects,
                vec![Effect::reply(prompts::ASK_TRACK_AGAIN, Keyboard::Back)]
            );
        }
    }

    #[test]
    fn over_long_text_reprompts_and_keeps_scratch() {
        // ---
        let before = run(vec![Action::SelectSend, text("42")]).session;

        let result = transition(&before, text(&"x".repeat(MAX_TEXT_CHARS + 1)));

        assert_eq!(result.session, before);
        assert_eq!(
            result.effects,
            vec![Effect::reply(
                prompts::text_too_long(MAX_TEXT_CHARS),
                Keyboard::Back
            )]
        );

        let at_limit = transition(&before, text(&"я".repeat(MAX_TEXT_CHARS)));
        assert_eq!(at_limit.session.state, DialogState::SendingTrack);
    }

    #[test]
    fn over_long_track_link_reprompts_and_keeps_scratch() {
        // ---
        let before = run(vec![Action::SelectSend, text("42"), text("hi")]).session;
        let link = format!("https://example.com/{}", "a".repeat(MAX_TRACK_LINK_CHARS));

        let result = transition(&before, text(&link));

        assert_eq!(result.session, before);
        assert_eq!(
            result.effects,
            vec![Effect::reply(
                prompts::track_link_too_long(MAX_TRACK_LINK_CHARS),
                Keyboard::Back
            )]
        );
    }

    #[test]
    fn track_link_scheme_is_case_insensitive() {
        // ---
        assert!(is_track_link("HTTPS://example.com/song"));
        assert!(is_track_link("Http://x"));
        assert!(is_track_link("  https://music.example/track?id=1  "));
        assert!(!is_track_link("https//example.com"));
        assert!(!is_track_link("see https://example.com"));
    }

    #[test]
    fn receive_flow_emits_fetch() {
        // ---
        let result = run(vec![Action::SelectReceive, text("7"), text(" s3cret ")]);

        assert_eq!(result.session, Session::idle());
        assert_eq!(
            result.effects,
            vec![Effect::FetchValentines {
                credential_id: 7,
                password: "s3cret".to_string(),
            }]
        );
    }

    #[test]
    fn non_numeric_id_reprompts() {
        // ---
        let before = run(vec![Action::SelectReceive]).session;
        let result = transition(&before, text("seven"));

        assert_eq!(result.session, before);
        assert_eq!(
            result.effects,
            vec![Effect::reply(prompts::ASK_ID_AGAIN, Keyboard::Back)]
        );
    }

    #[test]
    fn back_clears_scratch_from_every_state() {
        // ---
        let states = [
            vec![Action::SelectSend],
            vec![Action::SelectSend, text("1")],
            vec![Action::SelectSend, text("1"), text("hi")],
            vec![Action::SelectReceive],
            vec![Action::SelectReceive, text("1")],
        ];

        for actions in states {
            let before = run(actions).session;
            assert!(!before.state.is_idle());

            let result = transition(&before, Action::Back);
            assert_eq!(result.session, Session::idle());
            assert!(result.session.scratch.is_empty());
            assert_eq!(
                result.effects,
                vec![Effect::reply(prompts::BACK_TO_MENU, Keyboard::Main)]
            );
        }
    }

    #[test]
    fn menu_button_restarts_flow_with_empty_scratch() {
        // ---
        let mid_send = run(vec![Action::SelectSend, text("42"), text("hi")]).session;
        let result = transition(&mid_send, Action::SelectReceive);

        assert_eq!(
            result.session,
            Session::new(DialogState::GettingId, Scratch::default())
        );
    }

    #[test]
    fn free_text_in_idle_is_ignored() {
        // ---
        let result = transition(&Session::idle(), text("hello"));

        assert_eq!(result.session, Session::idle());
        assert_eq!(
            result.effects,
            vec![Effect::reply(prompts::MENU_HINT, Keyboard::Main)]
        );
    }

    #[test]
    fn inconsistent_session_resets() {
        // ---
        let broken = Session::new(DialogState::SendingTrack, Scratch::default());
        let result = transition(&broken, text("https://example.com"));
        assert_eq!(result.session, Session::idle());

        let broken = Session::new(DialogState::GettingPassword, Scratch::default());
        let result = transition(&broken, text("pw"));
        assert_eq!(result.session, Session::idle());
        assert!(matches!(result.effects[..], [Effect::Reply { .. }]));
    }
}
