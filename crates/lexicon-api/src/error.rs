//! HTTP error rendering.

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Internal(lexicon_core::Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
}

impl From<lexicon_core::Error> for ApiError {
    fn from(err: lexicon_core::Error) -> Self {
        use lexicon_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::WordNotFound(word) => ApiError::NotFound(format!("Word '{}' not found", word)),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Duplicate(word) => {
                ApiError::Conflict(format!("Word '{}' already exists", word))
            }
            other => ApiError::Internal(other),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Request failed");
                err.to_string()
            }
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Conflict(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
