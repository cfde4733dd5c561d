//! Structured errors for the HTTP layer.
//!
//! Validation problems become 400s; everything else is a 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors returned from request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Negative or malformed page parameters.
    #[error("invalid input parameters: {0}")]
    InvalidInput(String),

    /// The page could not be produced.
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<mixfeed_core::Error> for ApiError {
    fn from(err: mixfeed_core::Error) -> Self {
        match err {
            mixfeed_core::Error::InvalidInput(msg) => ApiError::InvalidInput(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::InvalidInput(_) => tracing::info!(error = %self, "rejected request"),
            ApiError::Internal(_) => tracing::error!(error = %self, "request failed"),
        }
        (status, self.to_string()).into_response()
    }
}
