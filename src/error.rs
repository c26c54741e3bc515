use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WordApiError>;

#[derive(Debug, Error)]
pub enum WordApiError {
    #[error("Too many requests, wait a few seconds between calls")]
    RateLimited,

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("No words of length {0}")]
    NoWordsOfLength(usize),

    #[error("Not found")]
    RouteNotFound,

    /// Only ever logged by the loader, never sent to a client.
    #[error("Failed to load word list from {url}: {reason}")]
    UpstreamLoad { url: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WordApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WordApiError::RateLimited
            | WordApiError::UnknownLanguage(_)
            | WordApiError::NoWordsOfLength(_) => StatusCode::FORBIDDEN,
            WordApiError::RouteNotFound => StatusCode::NOT_FOUND,
            WordApiError::UpstreamLoad { .. } | WordApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl IntoResponse for WordApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
