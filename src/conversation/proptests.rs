//! Property-based tests for the conversation state machine.

use super::*;
use proptest::prelude::*;

fn any_flow_session() -> impl Strategy<Value = Session> {
    // ---
    let state = prop_oneof![
        Just(DialogState::SendingCard),
        Just(DialogState::SendingText),
        Just(DialogState::SendingTrack),
        Just(DialogState::GettingId),
        Just(DialogState::GettingPassword),
    ];
    let scratch = (
        proptest::option::of(any::<i64>()),
        proptest::option::of(".{0,20}"),
        proptest::option::of(any::<i64>()),
    )
        .prop_map(|(recipient_id, text, credential_id)| Scratch {
            recipient_id,
            text,
            credential_id,
        });

    (state, scratch).prop_map(|(state, scratch)| Session::new(state, scratch))
}

proptest! {
    #[test]
    fn non_integer_card_or_id_changes_nothing(
        input in "[^0-9]*[a-zA-Z ,.!?]+[^0-9]*",
        receiving in any::<bool>(),
        scratch_text in proptest::option::of(".{0,10}"),
    ) {
        let state = if receiving { DialogState::GettingId } else { DialogState::SendingCard };
        let session = Session::new(state, Scratch { text: scratch_text, ..Scratch::default() });

        let result = transition(&session, Action::TextInput(input));

        prop_assert_eq!(&result.session, &session);
        prop_assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn non_http_track_link_changes_nothing(
        input in "[a-zA-Z0-9:/._-]{0,30}",
        recipient_id in any::<i64>(),
        text in ".{0,20}",
    ) {
        prop_assume!(!input.to_ascii_lowercase().starts_with("http://"));
        prop_assume!(!input.to_ascii_lowercase().starts_with("https://"));

        let session = Session::new(
            DialogState::SendingTrack,
            Scratch { recipient_id: Some(recipient_id), text: Some(text), credential_id: None },
        );

        let result = transition(&session, Action::TextInput(input));

        prop_assert_eq!(&result.session, &session);
    }

    #[test]
    fn back_always_returns_to_clean_idle(session in any_flow_session()) {
        let result = transition(&session, Action::Back);

        prop_assert_eq!(result.session, Session::idle());
        prop_assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn every_transition_emits_exactly_one_effect(
        session in any_flow_session(),
        input in ".{0,30}",
    ) {
        let result = transition(&session, Action::TextInput(input));

        prop_assert_eq!(result.effects.len(), 1);
    }

    #[test]
    fn integer_card_is_stored(recipient_id in any::<i64>()) {
        let session = Session::new(DialogState::SendingCard, Scratch::default());

        let result = transition(&session, Action::TextInput(format!(" {recipient_id} ")));

        prop_assert_eq!(result.session.state, DialogState::SendingText);
        prop_assert_eq!(result.session.scratch.recipient_id, Some(recipient_id));
    }
}
