//! Geocoding client error types.

use std::sync::Arc;

use propsearch_core::Error;

/// Errors from the geocoding provider client.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// Blank query; nothing to look up.
    #[error("empty query")]
    EmptyQuery,

    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Provider answered with no candidates.
    #[error("no results for {0:?}")]
    NotFound(String),

    /// Provider answered with something other than a usable candidate list.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Authentication failed (missing or invalid API key).
    #[error("authentication failed: check the geocoding API key")]
    AuthError,

    /// Rate limited by the provider.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { GeocodeError::Timeout } else { GeocodeError::Network(Arc::new(err)) }
    }
}

impl From<GeocodeError> for Error {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::EmptyQuery => Error::InvalidInput(err.to_string()),
            GeocodeError::NotFound(_) | GeocodeError::Malformed(_) => Error::LocationNotFound(err.to_string()),
            GeocodeError::Timeout => Error::UpstreamTimeout(err.to_string()),
            GeocodeError::InvalidBaseUrl(_)
            | GeocodeError::AuthError
            | GeocodeError::RateLimited
            | GeocodeError::HttpError { .. }
            | GeocodeError::Network(_) => Error::UpstreamError(err.to_string()),
        }
    }
}
