//! Maps `carsearch_core::Error` onto HTTP responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use carsearch_core::error::Error;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self { Self { message: message.into(), timestamp: Utc::now() } }
}

#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self { Self(err) }
}

// Extractor rejections go through the same `{message, timestamp}` body as
// every other client error.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self { Self(Error::InvalidRequest(rejection.body_text())) }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self { Self(Error::InvalidRequest(rejection.body_text())) }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self(Error::InvalidRequest(rejection.body_text())) }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() { StatusCode::BAD_REQUEST } else { StatusCode::INTERNAL_SERVER_ERROR }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();
        if status.is_client_error() {
            tracing::warn!("Exception, {}", message);
        } else {
            tracing::error!(error = %message, "request failed");
        }
        (status, Json(ErrorBody::new(message))).into_response()
    }
}
