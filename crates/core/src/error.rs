//! Unified error types for propsearch.
//!
//! Every variant carries a machine-readable prefix in its display form so
//! log lines and HTTP bodies can be matched without parsing prose.

use tokio_rusqlite::rusqlite;

/// Unified error types for the propsearch service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input (bad coordinates, blank query, negative radius).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// No property with the requested id.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// The geocoding provider returned nothing usable for the query.
    #[error("LOCATION_NOT_FOUND: {0}")]
    LocationNotFound(String),

    /// The geocoding provider did not answer within the timeout.
    #[error("UPSTREAM_TIMEOUT: {0}")]
    UpstreamTimeout(String),

    /// The geocoding provider was unreachable or answered with an error status.
    #[error("UPSTREAM_ERROR: {0}")]
    UpstreamError(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl Error {
    /// Stable error code, the display prefix without the message.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::NotFound(_) => "NOT_FOUND",
            Error::LocationNotFound(_) => "LOCATION_NOT_FOUND",
            Error::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            Error::UpstreamError(_) => "UPSTREAM_ERROR",
            Error::Database(_) | Error::MigrationFailed(_) => "STORE_ERROR",
        }
    }

    /// Whether the failure is attributable to the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::NotFound(_) | Error::LocationNotFound(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
