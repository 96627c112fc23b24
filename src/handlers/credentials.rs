use crate::app_state::AppState;
use crate::domain::Credential;
use crate::handlers::shared_types::HandlerError;
use axum::{
    extract::{Path, State},
    Json,
};

/// Handler for fetching a credential by card number (GET /credentials/{id}).
///
/// - `200 OK` with `{ "id", "password" }` when the card exists.
/// - `404 Not Found` with `{ "detail": "Credential not found" }` otherwise.
///
/// Password comparison is the caller's job; this endpoint only reads.
#[tracing::instrument(skip(state))]
pub async fn get_credential(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Credential>, HandlerError> {
    // ---
    let credential = state
        .repository()
        .get_credential(id)
        .await
        .map_err(|e| HandlerError::internal("Failed to fetch credential", e))?;

    state.metrics().record_credential_lookup(credential.is_some());

    credential
        .map(Json)
        .ok_or(HandlerError::NotFound("Credential not found"))
}
