//! Error mapping for HTTP-backed providers.

use mixfeed_core::ProviderError;

/// Errors raised while constructing a provider client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid provider URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Classify a transport failure.
pub(crate) fn from_reqwest(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::Parse(err.to_string())
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Classify a non-success HTTP status.
pub(crate) fn from_status(status: reqwest::StatusCode) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ProviderError::Unavailable("rate limited: too many requests".into())
    } else {
        ProviderError::HttpError { status: status.as_u16() }
    }
}
