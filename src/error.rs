// Single error-translation boundary between the dispatch layer and HTTP.
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::validation::RuleViolation;

/// Request-level error with a status code, a client-safe message, and a
/// machine-readable code. Collaborator failures convert into this type at
/// the boundary; internal details are logged, never returned.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation { violations: Vec<RuleViolation> },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable (collaborator failure)
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Internal(msg)
            | ApiError::ServiceUnavailable(msg) => msg.clone(),
            ApiError::Validation { violations } => {
                format!("Validation failed with {} violation(s)", violations.len())
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// JSON body for the HTTP response. Validation errors carry the full
    /// violation list, never just the first.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { violations } => json!({
                "error": true,
                "message": self.message(),
                "code": self.error_code(),
                "violations": violations,
            }),
            _ => json!({
                "error": true,
                "message": self.message(),
                "code": self.error_code(),
            }),
        }
    }
}

// Static constructors, matching the taxonomy call sites use.
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation(violations: Vec<RuleViolation>) -> Self {
        ApiError::Validation { violations }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        match err {
            crate::store::StoreError::Unavailable(msg) => {
                tracing::error!("store unavailable: {}", msg);
                ApiError::service_unavailable("Storage temporarily unavailable")
            }
            crate::store::StoreError::Query(msg) => {
                // Never expose query internals to clients.
                tracing::error!("store query error: {}", msg);
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("response serialization error: {}", err);
        ApiError::internal("Failed to format response")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
