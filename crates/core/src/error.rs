//! Unified error types for mixfeed.
//!
//! `Error` is what the read path hands back to callers; `ProviderError` is what
//! provider clients report to the cache, which absorbs it into a fail flag.

/// Unified error type for the mixfeed read path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., negative limit or offset).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Anything else that prevented a page from being produced.
    #[error("INTERNAL: {0}")]
    Internal(String),

    /// The cache refresh tasks were already started.
    #[error("ALREADY_STARTED: cache refresh tasks are already running")]
    AlreadyStarted,
}

impl Error {
    /// Whether the caller is at fault (and should not retry the same request).
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Errors reported by a provider client for a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Response body larger than the client accepts.
    #[error("response too large: {0}")]
    TooLarge(String),

    /// The provider refused or could not serve content.
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("limit must not be negative".to_string());
        assert!(err.to_string().contains("INVALID_INPUT"));
        assert!(err.to_string().contains("limit must not be negative"));
    }

    #[test]
    fn test_is_validation() {
        assert!(Error::InvalidInput("x".into()).is_validation());
        assert!(!Error::Internal("x".into()).is_validation());
        assert!(!Error::AlreadyStarted.is_validation());
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::HttpError { status: 503 };
        assert_eq!(err.to_string(), "HTTP error: 503");
        assert_eq!(ProviderError::Timeout.to_string(), "request timeout");
    }
}
