use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// JSON body carried by every non-success response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Failure outcomes of the API handlers.
#[derive(Debug)]
pub enum HandlerError {
    /// The addressed record does not exist; the message is shown to end users.
    NotFound(&'static str),
    /// Storage failure. Details are logged, not returned.
    Internal,
}

impl HandlerError {
    /// Log a storage error and collapse it into `Internal`.
    pub fn internal(context: &str, err: anyhow::Error) -> Self {
        // ---
        tracing::error!("{}: {:#}", context, err);
        HandlerError::Internal
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        // ---
        let (status, detail) = match self {
            HandlerError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            HandlerError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        };

        (
            status,
            Json(ErrorBody {
                detail: detail.to_string(),
            }),
        )
            .into_response()
    }
}
