//! API Error Handling
//!
//! Webhook callers get terse plain-text answers; the interesting detail
//! goes to the log, not to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// API error type
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        (status, format!("{}\n", message.to_uppercase())).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
