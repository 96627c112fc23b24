use serde::{Deserialize, Serialize};

/// A recipient's card: the printed card number plus its shared password.
///
/// Credentials are seeded once from a file and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    // ---
    /// Card number, assigned outside the system.
    pub id: i64,

    /// Plaintext password printed alongside the card number.
    pub password: String,
}

impl Credential {
    // ---
    pub fn new(id: i64, password: impl Into<String>) -> Self {
        // ---
        Self {
            id,
            password: password.into(),
        }
    }
}

/// A persisted valentine addressed to one credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valentine {
    // ---
    /// Store-assigned identifier; increases with creation order.
    pub id: i64,

    /// Message body.
    pub text: String,

    /// Link to the sender's chosen track.
    pub track_link: String,

    /// Card number of the recipient.
    pub recipient_id: i64,

    /// Free-text sender signature. Not tied to any credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

/// Request body for creating a valentine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewValentine {
    // ---
    pub text: String,
    pub track_link: String,
    pub recipient_id: i64,
    #[serde(default)]
    pub sender: Option<String>,
}

impl NewValentine {
    // ---
    pub fn new(text: impl Into<String>, track_link: impl Into<String>, recipient_id: i64) -> Self {
        // ---
        Self {
            text: text.into(),
            track_link: track_link.into(),
            recipient_id,
            sender: None,
        }
    }

    /// Attach the assigned id, producing the stored record.
    pub fn into_valentine(self, id: i64) -> Valentine {
        // ---
        Valentine {
            id,
            text: self.text,
            track_link: self.track_link,
            recipient_id: self.recipient_id,
            sender: self.sender,
        }
    }
}
