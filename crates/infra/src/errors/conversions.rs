//! Conversions from external infrastructure errors into domain errors.

use caledit_domain::CalEditError;
use reqwest::{Error as HttpError, StatusCode};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CalEditError);

impl From<InfraError> for CalEditError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CalEditError> for InfraError {
    fn from(value: CalEditError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoCalEditError {
    fn into_caledit(self) -> CalEditError;
}

/// Map a non-success HTTP status to the domain error it represents.
///
/// `detail` is appended to the message, typically the response body or the
/// API's error message.
pub fn status_error(status: StatusCode, detail: &str) -> CalEditError {
    let mut message =
        format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"));
    let detail = detail.trim();
    if !detail.is_empty() {
        message.push_str(": ");
        message.push_str(detail);
    }

    match status.as_u16() {
        401 | 403 => CalEditError::Auth(message),
        404 | 410 => CalEditError::NotFound(message),
        429 => CalEditError::Network(message),
        400..=499 => CalEditError::Rejected(message),
        _ => CalEditError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CalEditError */
/* -------------------------------------------------------------------------- */

impl IntoCalEditError for HttpError {
    fn into_caledit(self) -> CalEditError {
        if self.is_timeout() {
            return CalEditError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return CalEditError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return CalEditError::InvalidInput(format!("failed to decode HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, "");
        }

        CalEditError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_caledit())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → CalEditError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(CalEditError::InvalidInput(format!("malformed JSON payload: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
