//! HTTP error mapping for the propsearch server.
//!
//! Core errors keep their machine-readable code; this module only decides the
//! status code and the JSON body.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use propsearch_core::Error;
use serde::Serialize;

/// Error returned by every handler.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub Error);

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl ApiError {
    /// Map error to HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::LocationNotFound(_) => StatusCode::BAD_REQUEST,
            Error::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Error::Database(_) | Error::MigrationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(Error::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.0.is_client_error() {
            tracing::debug!(error = %self.0, "request rejected");
        } else {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = ErrorResponse { error: self.0.to_string(), code: self.0.code(), status: status.as_u16() };
        (status, Json(body)).into_response()
    }
}
