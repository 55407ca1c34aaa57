//! Error taxonomy shared by the application layer and the HTTP surface.

use crate::domain::report::MalformedRenditionKey;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AutoabrResult<T> = Result<T, AutoabrError>;

#[derive(Debug, Error)]
pub enum AutoabrError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to fetch configuration from {url}: {reason}")]
    ConfigFetch { url: String, reason: String },

    #[error("Worker not found: {0}")]
    WorkerNotFound(String),

    #[error("Failed to fetch scores from {location}: {reason}")]
    ScoreFetch { location: String, reason: String },

    #[error(transparent)]
    MalformedRenditionKey(#[from] MalformedRenditionKey),

    #[error("Worker {0} is not reserved for a new job")]
    WorkerBusy(String),
}

impl AutoabrError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config_fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::ConfigFetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn score_fetch(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::ScoreFetch {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AutoabrError::Validation(_) => StatusCode::BAD_REQUEST,
            AutoabrError::WorkerNotFound(_) => StatusCode::NOT_FOUND,
            AutoabrError::WorkerBusy(_) => StatusCode::CONFLICT,
            AutoabrError::ConfigFetch { .. }
            | AutoabrError::ScoreFetch { .. }
            | AutoabrError::MalformedRenditionKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AutoabrError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
