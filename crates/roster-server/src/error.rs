//! Error handling for the REST API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_core::RosterError;
use serde::Serialize;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub suggestion: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn with_suggestion(mut self, suggestion: Option<&str>) -> Self {
        self.suggestion = suggestion.map(|s| s.to_string());
        self
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            code: self.code,
            message: self.message,
            suggestion: self.suggestion,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        let suggestion = err.suggestion().map(|s| s.to_string());
        let code = err.code().as_str().to_string();
        let message = err.to_string();

        let details = match &err {
            RosterError::Validation { details, .. } if !details.is_empty() => {
                serde_json::to_value(details).ok()
            }
            _ => None,
        };

        let status = match &err {
            // Caller misuse: bad operation tags or snapshot pairs.
            RosterError::InvalidOperation { .. }
            | RosterError::InconsistentSnapshotPair { .. } => StatusCode::BAD_REQUEST,
            RosterError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RosterError::NotFound { .. } | RosterError::VersionNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            // A malformed snapshot is a programming error, not caller input.
            RosterError::InvalidSnapshot { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ApiError {
            status,
            code,
            message,
            suggestion: None,
            details,
        }
        .with_suggestion(suggestion.as_deref())
    }
}
