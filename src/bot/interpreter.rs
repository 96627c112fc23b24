//! Executes conversation effects against the backend API.

use crate::client::{ApiError, ErrorKind, ValentineApi};
use crate::conversation::{prompts, Effect, Keyboard};
use crate::domain::NewValentine;

/// One message to deliver to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Outgoing {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

/// Run one effect, returning the messages it produces.
///
/// Backend failures become user-facing messages; nothing here is retried and
/// nothing here fails.
pub async fn execute(api: &dyn ValentineApi, effect: Effect) -> Vec<Outgoing> {
    // ---
    match effect {
        Effect::Reply { text, keyboard } => vec![Outgoing::new(text, keyboard)],
        Effect::SubmitValentine(valentine) => vec![submit(api, &valentine).await],
        Effect::FetchValentines {
            credential_id,
            password,
        } => fetch(api, credential_id, &password).await,
    }
}

async fn submit(api: &dyn ValentineApi, valentine: &NewValentine) -> Outgoing {
    // ---
    match api.create_valentine(valentine).await {
        Ok(created) => {
            tracing::info!(
                "Valentine {} sent to card {}",
                created.id,
                created.recipient_id
            );
            Outgoing::new(prompts::valentine_sent(created.id), Keyboard::Main)
        }
        Err(err) => Outgoing::new(failure_message(&err), Keyboard::Main),
    }
}

async fn fetch(api: &dyn ValentineApi, credential_id: i64, password: &str) -> Vec<Outgoing> {
    // ---
    let credential = match api.get_credential(credential_id).await {
        Ok(credential) => credential,
        Err(err) => return vec![Outgoing::new(failure_message(&err), Keyboard::Main)],
    };

    if credential.password != password {
        tracing::info!("Wrong password for card {}", credential_id);
        return vec![Outgoing::new(prompts::WRONG_PASSWORD, Keyboard::Main)];
    }

    let valentines = match api.list_valentines_by_recipient(credential_id).await {
        Ok(valentines) => valentines,
        Err(err) => return vec![Outgoing::new(failure_message(&err), Keyboard::Main)],
    };

    if valentines.is_empty() {
        return vec![Outgoing::new(prompts::NO_VALENTINES, Keyboard::Main)];
    }

    let mut out: Vec<Outgoing> = valentines
        .iter()
        .map(|v| Outgoing::new(prompts::valentine(&v.text, &v.track_link), Keyboard::Keep))
        .collect();
    out.push(Outgoing::new(prompts::DONE, Keyboard::Main));
    out
}

/// User-facing text for a failed API call.
///
/// Backend detail is shown verbatim; transport problems get a generic message.
pub fn failure_message(err: &ApiError) -> String {
    // ---
    match err.kind() {
        ErrorKind::Transport => {
            tracing::error!("Backend unreachable: {}", err);
            prompts::SERVICE_UNAVAILABLE.to_string()
        }
        _ => {
            tracing::warn!("Backend rejected request: {}", err);
            prompts::error(err.detail().unwrap_or_default())
        }
    }
}
