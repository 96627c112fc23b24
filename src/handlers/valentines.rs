use crate::app_state::AppState;
use crate::domain::{NewValentine, Valentine};
use crate::handlers::shared_types::HandlerError;
use axum::{
    extract::{Path, State},
    Json,
};

/// Handler for creating a valentine (POST /valentines).
///
/// Expects `{ "text", "track_link", "recipient_id", "sender"? }`.
///
/// - If no credential exists for `recipient_id`, responds with `404 Not Found`
///   and stores nothing.
/// - On success, responds with `200 OK` and the stored record including its id.
#[tracing::instrument(skip(state, body), fields(recipient_id = body.recipient_id))]
pub async fn create_valentine(
    State(state): State<AppState>,
    Json(body): Json<NewValentine>,
) -> Result<Json<Valentine>, HandlerError> {
    // ---
    let created = state
        .repository()
        .create_valentine(body)
        .await
        .map_err(|e| HandlerError::internal("Failed to create valentine", e))?
        .ok_or(HandlerError::NotFound("Recipient not found"))?;

    tracing::info!("Created valentine {}", created.id);
    state.metrics().record_valentine_created();

    Ok(Json(created))
}

/// Handler for fetching a valentine by id (GET /valentines/{id}).
#[tracing::instrument(skip(state))]
pub async fn get_valentine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Valentine>, HandlerError> {
    // ---
    state
        .repository()
        .get_valentine(id)
        .await
        .map_err(|e| HandlerError::internal("Failed to fetch valentine", e))?
        .map(Json)
        .ok_or(HandlerError::NotFound("Valentine not found"))
}

/// Handler for listing a recipient's valentines (GET /valentines/recipient/{id}).
///
/// Always `200 OK`; an unknown recipient or one with no mail yields `[]`.
/// Records are ordered by creation.
#[tracing::instrument(skip(state))]
pub async fn list_valentines_by_recipient(
    State(state): State<AppState>,
    Path(recipient_id): Path<i64>,
) -> Result<Json<Vec<Valentine>>, HandlerError> {
    // ---
    let valentines = state
        .repository()
        .list_valentines_by_recipient(recipient_id)
        .await
        .map_err(|e| HandlerError::internal("Failed to list valentines", e))?;

    Ok(Json(valentines))
}
