//! API client error taxonomy.

use reqwest::StatusCode;
use thiserror::Error;

/// Classification used by callers to decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The credential or valentine does not exist.
    NotFound,
    /// The request was rejected as malformed.
    Invalid,
    /// The request conflicts with existing state. Reserved; no endpoint returns it today.
    Conflict,
    /// Any other non-success response.
    Status,
    /// The backend could not be reached or its response could not be read.
    Transport,
}

/// Error returned by every API client call. Never retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{detail}")]
    NotFound { detail: String },

    #[error("{detail}")]
    Invalid { detail: String },

    #[error("{detail}")]
    Conflict { detail: String },

    #[error("unexpected status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    // ---
    /// Map a non-success status and its detail message to an error.
    pub fn from_status(status: StatusCode, detail: String) -> Self {
        // ---
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound { detail },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Invalid { detail }
            }
            StatusCode::CONFLICT => ApiError::Conflict { detail },
            other => ApiError::Status {
                status: other.as_u16(),
                detail,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        // ---
        match self {
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Invalid { .. } => ErrorKind::Invalid,
            ApiError::Conflict { .. } => ErrorKind::Conflict,
            ApiError::Status { .. } => ErrorKind::Status,
            ApiError::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Server-provided detail message, if the backend answered at all.
    pub fn detail(&self) -> Option<&str> {
        // ---
        match self {
            ApiError::NotFound { detail }
            | ApiError::Invalid { detail }
            | ApiError::Conflict { detail }
            | ApiError::Status { detail, .. } => Some(detail),
            ApiError::Transport(_) => None,
        }
    }
}
