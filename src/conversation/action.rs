//! User actions and the transport-boundary parser that produces them.

/// Label of the main-menu button that starts the send flow.
pub const BUTTON_SEND: &str = "Send";

/// Label of the main-menu button that starts the receive flow.
pub const BUTTON_RECEIVE: &str = "Receive";

/// Label of the in-flow button that abandons the flow.
pub const BUTTON_BACK: &str = "Back";

/// Bot command that resets the chat.
pub const COMMAND_START: &str = "/start";

/// What the user did, independent of the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Back,
    SelectSend,
    SelectReceive,
    TextInput(String),
}

impl Action {
    /// Classify an incoming text message.
    ///
    /// Buttons match their exact label; `/start` may carry a deep-link payload
    /// or a `@botname` suffix. Everything else is free text, passed untrimmed.
    pub fn parse(text: &str) -> Self {
        // ---
        let trimmed = text.trim();
        let command = trimmed.split_whitespace().next().unwrap_or_default();
        let command = command.split('@').next().unwrap_or_default();

        if command == COMMAND_START {
            return Action::Start;
        }

        match trimmed {
            BUTTON_BACK => Action::Back,
            BUTTON_SEND => Action::SelectSend,
            BUTTON_RECEIVE => Action::SelectReceive,
            _ => Action::TextInput(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn parses_buttons_and_commands() {
        // ---
        assert_eq!(Action::parse("/start"), Action::Start);
        assert_eq!(Action::parse("/start promo"), Action::Start);
        assert_eq!(Action::parse("/start@valentine_bot"), Action::Start);
        assert_eq!(Action::parse("Back"), Action::Back);
        assert_eq!(Action::parse(" Send "), Action::SelectSend);
        assert_eq!(Action::parse("Receive"), Action::SelectReceive);
    }

    #[test]
    fn everything_else_is_text() {
        // ---
        assert_eq!(Action::parse("back"), Action::TextInput("back".into()));
        assert_eq!(Action::parse("/started"), Action::TextInput("/started".into()));
        assert_eq!(Action::parse("  42 "), Action::TextInput("  42 ".into()));
    }
}
