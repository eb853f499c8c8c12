//! Error responses for the control surface

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use caledit_core::SyncError;
use caledit_domain::CalEditError;
use serde::Serialize;

use crate::utils::logging::error_label;

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

/// Domain error tagged with the HTTP status it is answered with
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    source: CalEditError,
}

impl ApiError {
    /// Failure of the remote calendar service behind a request.
    pub fn upstream(source: CalEditError) -> Self {
        Self { status: StatusCode::BAD_GATEWAY, source }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<CalEditError> for ApiError {
    fn from(source: CalEditError) -> Self {
        let status = match &source {
            CalEditError::Config(_) | CalEditError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CalEditError::NotFound(_) => StatusCode::NOT_FOUND,
            CalEditError::Network(_)
            | CalEditError::Auth(_)
            | CalEditError::Rejected(_)
            | CalEditError::Timeout(_) => StatusCode::BAD_GATEWAY,
            CalEditError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self { status, source }
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Configuration(message) => CalEditError::Config(message).into(),
            other => {
                let source = other
                    .domain_error()
                    .cloned()
                    .unwrap_or_else(|| CalEditError::Internal(other.to_string()));
                Self::upstream(source)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body =
            Json(ErrorResponse { error: error_label(&self.source), message: self.source.to_string() });
        (self.status, body).into_response()
    }
}
