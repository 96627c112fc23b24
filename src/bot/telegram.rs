//! Minimal Telegram Bot API transport: long polling and text replies.

use super::interpreter::Outgoing;
use crate::conversation::{Keyboard, BUTTON_BACK, BUTTON_RECEIVE, BUTTON_SEND};
use anyhow::{bail, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Extra time allowed on top of the long-poll timeout before the HTTP call gives up.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// `sendMessage` text limit, counted in UTF-16 code units.
const MAX_MESSAGE_UNITS: usize = 4096;

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Serialize)]
struct GetUpdates<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<Value>,
}

/// Telegram Bot API client bound to one bot token.
pub struct TelegramClient {
    http: Client,
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    // ---
    /// # Errors
    /// Fails only if the HTTP client cannot be built.
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self> {
        // ---
        let http = Client::builder()
            .timeout(poll_timeout + POLL_GRACE)
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            poll_timeout,
        })
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T> {
        // ---
        let response: TelegramResponse<T> = self
            .http
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
            // Strip the URL so the token never reaches the logs.
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        match response {
            TelegramResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            TelegramResponse { description, .. } => bail!(
                "Telegram {} failed: {}",
                method,
                description.unwrap_or_else(|| "no description".to_string())
            ),
        }
    }

    /// Long-poll for message updates with id `>= offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        // ---
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.poll_timeout.as_secs(),
                allowed_updates: &["message"],
            },
        )
        .await
    }

    /// Send one reply to a chat.
    ///
    /// Text over the Telegram limit goes out as several messages; the keyboard
    /// rides on the last one.
    pub async fn send_message(&self, chat_id: i64, message: &Outgoing) -> Result<()> {
        // ---
        let chunks = split_message(&message.text, MAX_MESSAGE_UNITS);
        let last = chunks.len() - 1;

        for (n, chunk) in chunks.into_iter().enumerate() {
            let reply_markup = if n == last {
                reply_markup(message.keyboard)
            } else {
                None
            };
            let _: Value = self
                .call(
                    "sendMessage",
                    &SendMessage {
                        chat_id,
                        text: chunk,
                        reply_markup,
                    },
                )
                .await?;
        }

        Ok(())
    }
}

/// Cut `text` into pieces of at most `limit` UTF-16 units, preferring to break
/// at a newline. Always returns at least one piece.
fn split_message(text: &str, limit: usize) -> Vec<&str> {
    // ---
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.encode_utf16().count() > limit {
        let mut units = 0;
        let mut cut = 0;
        let mut newline = None;

        for (idx, ch) in rest.char_indices() {
            if ch == '\n' && idx > 0 {
                newline = Some(idx);
            }
            units += ch.len_utf16();
            if units > limit {
                break;
            }
            cut = idx + ch.len_utf8();
        }

        match newline {
            Some(idx) => {
                chunks.push(&rest[..idx]);
                rest = &rest[idx + 1..];
            }
            None => {
                chunks.push(&rest[..cut]);
                rest = &rest[cut..];
            }
        }
    }

    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// Telegram `ReplyKeyboardMarkup` for a keyboard choice.
fn reply_markup(keyboard: Keyboard) -> Option<Value> {
    // ---
    let rows = match keyboard {
        Keyboard::Main => json!([[{ "text": BUTTON_SEND }], [{ "text": BUTTON_RECEIVE }]]),
        Keyboard::Back => json!([[{ "text": BUTTON_BACK }]]),
        Keyboard::Keep => return None,
    };

    Some(json!({ "keyboard": rows, "resize_keyboard": true }))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn keep_sends_no_markup() {
        assert!(reply_markup(Keyboard::Keep).is_none());
    }

    #[test]
    fn main_menu_has_both_buttons() {
        // ---
        let markup = reply_markup(Keyboard::Main).unwrap();
        assert_eq!(markup["keyboard"][0][0]["text"], "Send");
        assert_eq!(markup["keyboard"][1][0]["text"], "Receive");
        assert_eq!(markup["resize_keyboard"], true);
    }

    #[test]
    fn short_text_is_one_message() {
        assert_eq!(split_message("hi\nhttps://x", 4096), vec!["hi\nhttps://x"]);
        assert_eq!(split_message("", 4096), vec![""]);
    }

    #[test]
    fn over_long_valentine_is_split_without_losing_text() {
        // ---
        let text = "a".repeat(4096);
        let link = "https://example.com/song";
        let message = format!("{text}\n{link}");

        let chunks = split_message(&message, MAX_MESSAGE_UNITS);

        assert_eq!(chunks, vec![text.as_str(), link]);
    }

    #[test]
    fn split_counts_utf16_units_and_keeps_char_boundaries() {
        // ---
        // Each emoji is two UTF-16 units.
        let message = "\u{1F496}".repeat(5);

        let chunks = split_message(&message, 4);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.encode_utf16().count() <= 4));
        assert_eq!(chunks.concat(), message);
    }

    #[test]
    fn split_without_newline_cuts_at_limit() {
        // ---
        let chunks = split_message("abcdefghij", 4);

        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn updates_parse_with_and_without_text() {
        // ---
        let raw = r#"{"ok":true,"result":[
            {"update_id":10,"message":{"message_id":1,"chat":{"id":99,"type":"private"},"text":"/start"}},
            {"update_id":11,"message":{"message_id":2,"chat":{"id":99,"type":"private"},"sticker":{}}},
            {"update_id":12,"edited_message":{"message_id":1,"chat":{"id":99}}}
        ]}"#;

        let parsed: TelegramResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        let updates = parsed.result.unwrap();

        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].message.as_ref().unwrap().text.as_deref(), Some("/start"));
        assert!(updates[1].message.as_ref().unwrap().text.is_none());
        assert!(updates[2].message.is_none());
    }
}
