//! Request-level errors and their JSON responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

// ---

/// Everything a handler can fail with.
///
/// The client-facing variants map to fixed messages; storage failures are
/// logged and reported as a generic 500 so the cause never leaks.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ---
    #[error("Area not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Missing data")]
    InvalidInput,

    #[error("database error")]
    Storage(#[from] sqlx::Error),
}

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // ---
        let message = match &self {
            Self::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (self.status_code(), Json(ErrorBody { error: message })).into_response()
    }
}
