//! HTTP client for the valentine API.

use super::{ApiError, ValentineApi};
use crate::domain::{Credential, NewValentine, Valentine};
use crate::handlers::ErrorBody;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Typed wrapper over the backend's HTTP surface.
///
/// Holds one pooled `reqwest::Client`; connections are released when the
/// `ApiClient` (and every clone of the inner client) is dropped.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    // ---
    /// Build a client with its own connection pool and a per-request timeout.
    ///
    /// # Errors
    /// Fails only if the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        // ---
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Reuse a caller-supplied `reqwest::Client`.
    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        // ---
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET /valentines/{id}
    pub async fn get_valentine(&self, id: i64) -> Result<Valentine, ApiError> {
        // ---
        let response = self
            .http
            .get(self.url(&format!("/valentines/{id}")))
            .send()
            .await?;
        decode(response).await
    }
}

#[async_trait]
impl ValentineApi for ApiClient {
    // ---
    async fn get_credential(&self, id: i64) -> Result<Credential, ApiError> {
        // ---
        let response = self
            .http
            .get(self.url(&format!("/credentials/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    async fn create_valentine(&self, valentine: &NewValentine) -> Result<Valentine, ApiError> {
        // ---
        let response = self
            .http
            .post(self.url("/valentines"))
            .json(valentine)
            .send()
            .await?;
        decode(response).await
    }

    async fn list_valentines_by_recipient(
        &self,
        recipient_id: i64,
    ) -> Result<Vec<Valentine>, ApiError> {
        // ---
        let response = self
            .http
            .get(self.url(&format!("/valentines/recipient/{recipient_id}")))
            .send()
            .await?;
        decode(response).await
    }
}

/// Decode a success body, or turn a failure status into a typed error.
///
/// The detail comes from the `{ "detail": ... }` body when present, falling
/// back to the raw body text and then to the status reason phrase.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    // ---
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.detail,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };

    tracing::debug!("API responded {} ({})", status, detail);
    Err(ApiError::from_status(status, detail))
}
