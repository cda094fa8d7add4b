//! HTTP-facing error type.
//!
//! Every failure leaves the gateway as `{"success": false, "error": "..."}`
//! with a status derived from the [`ErrorCategory`] of the underlying
//! [`MediaError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::core::error::{ErrorCategory, MediaError};

/// Non-standard status used when the client closed the request.
const CLIENT_CLOSED_REQUEST: u16 = 499;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub category: Option<ErrorCategory>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            category: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            category: Some(ErrorCategory::ClientInput),
            ..Self::new(StatusCode::BAD_REQUEST, message)
        }
    }
}

/// HTTP status for an error category, given the upstream status if any.
pub fn status_for(category: ErrorCategory, upstream: Option<u16>) -> StatusCode {
    match category {
        ErrorCategory::ClientInput => StatusCode::BAD_REQUEST,
        ErrorCategory::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCategory::ProviderTransport => upstream
            .and_then(|code| StatusCode::from_u16(code).ok())
            .filter(|code| code.is_client_error() || code.is_server_error())
            .unwrap_or(StatusCode::BAD_GATEWAY),
        ErrorCategory::ProviderContract | ErrorCategory::JobFailed => StatusCode::BAD_GATEWAY,
        ErrorCategory::Timeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorCategory::Cancelled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        let upstream = match &err {
            MediaError::ProviderTransport { status, .. } => *status,
            _ => None,
        };
        let category = err.category();
        Self {
            status: status_for(category, upstream),
            message: err.to_string(),
            category: Some(category),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "success": false,
                "error": self.message,
            })),
        )
            .into_response()
    }
}
