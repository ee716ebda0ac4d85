//! Error plumbing shared by every route.
//!
//! DESIGN
//! ======
//! Each subsystem owns a `thiserror` enum and implements [`ErrorCode`] so
//! logs carry a grepable code and a retryable hint. Route handlers collapse
//! those into [`ApiError`], which renders the JSON error bodies the dashboard
//! expects: `{error}` for bad input, `{success: false, error}` otherwise.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Grepable code + retry hint for subsystem errors.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Failure surfaced to an HTTP caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was malformed or missing a required field.
    #[error("{0}")]
    BadRequest(String),

    /// An upstream dependency failed and no fallback applies.
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "E_BAD_REQUEST",
            Self::Upstream(_) => "E_UPSTREAM",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest(message) => json!({ "error": message }),
            Self::Upstream(message) => json!({ "success": false, "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
