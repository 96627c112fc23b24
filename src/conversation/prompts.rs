//! User-facing message texts.

pub const GREETING: &str = "Hi! Send an anonymous valentine or check the ones sent to you.";
pub const MENU_HINT: &str = "Use the menu buttons below.";
pub const BACK_TO_MENU: &str = "Back to the menu.";

pub const ASK_CARD: &str = "Send the card number.";
pub const ASK_CARD_AGAIN: &str = "A number is required. Send the card number.";
pub const ASK_TEXT: &str = "Write the text of your valentine.";
pub const ASK_TRACK: &str = "Send a link to your favourite track.";
pub const ASK_TRACK_AGAIN: &str =
    "The link must start with http:// or https://. Send a link to your favourite track.";

pub const ASK_ID: &str = "Enter your id.";
pub const ASK_ID_AGAIN: &str = "A number is required. Enter your id.";
pub const ASK_PASSWORD: &str = "Enter your password.";

pub const WRONG_PASSWORD: &str = "Wrong password.";
pub const NO_VALENTINES: &str = "You have no valentines.";
pub const DONE: &str = "Done.";
pub const SERVICE_UNAVAILABLE: &str = "Service is unavailable, try again later.";

pub fn valentine_sent(id: i64) -> String {
    format!("Valentine sent (id {id}).")
}

pub fn text_too_long(limit: usize) -> String {
    format!("The text is too long, keep it under {limit} characters. Write the text of your valentine.")
}

pub fn track_link_too_long(limit: usize) -> String {
    format!("The link is too long, keep it under {limit} characters. Send a link to your favourite track.")
}

pub fn error(detail: &str) -> String {
    format!("Error: {detail}")
}

pub fn valentine(text: &str, track_link: &str) -> String {
    format!("{text}\n{track_link}")
}
