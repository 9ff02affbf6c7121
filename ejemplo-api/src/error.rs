//! Error Types for Ejemplo API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//! - The mapping from the retrieval error taxonomy to HTTP errors
//!
//! All errors are serialized as JSON with appropriate HTTP status codes and
//! are never cached by intermediaries.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use ejemplo_core::{EjemploError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MISSING_NODES_MESSAGE, UNCACHEABLE_CACHE_CONTROL};

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code and represents
/// a category of error that can occur while serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Required parameter is missing from the request
    MissingField,

    /// Request contains an invalid value
    InvalidInput,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// One or more requested entities do not exist
    EntityNotFound,

    // ========================================================================
    // Server Errors (500)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Content store operation failed
    StorageError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MissingField | ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,

            ErrorCode::EntityNotFound => StatusCode::NOT_FOUND,

            ErrorCode::InternalError | ErrorCode::StorageError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::EntityNotFound => "Entity not found",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Content store operation failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (offending value, missing ids)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Create a MissingField error.
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingField, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create an EntityNotFound error with a custom message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EntityNotFound, message)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Error responses are JSON and carry `Cache-Control: no-cache, private`.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (
            status,
            [(header::CACHE_CONTROL, UNCACHEABLE_CACHE_CONTROL)],
            Json(self),
        )
            .into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingIdentifiers => ApiError::missing_field(MISSING_NODES_MESSAGE),
            ValidationError::InvalidIdentifier { value } => {
                ApiError::invalid_input(format!("Invalid value \"{}\".", value))
                    .with_details(serde_json::json!({ "value": value }))
            }
        }
    }
}

/// Convert from the retrieval error taxonomy to ApiError.
///
/// Store and renderer failures are logged in full and answered with a
/// generic message.
impl From<EjemploError> for ApiError {
    fn from(err: EjemploError) -> Self {
        match err {
            EjemploError::Validation(validation) => validation.into(),
            EjemploError::NotFound { ref missing } => {
                let ids: Vec<u64> = missing.iter().map(|id| id.get()).collect();
                ApiError::not_found(err.to_string())
                    .with_details(serde_json::json!({ "missing": ids }))
            }
            EjemploError::Storage(storage) => {
                tracing::error!(error = %storage, "Content store error");
                ApiError::from_code(ErrorCode::StorageError)
            }
            EjemploError::Render(render) => {
                tracing::error!(error = %render, "Render error");
                ApiError::internal_error("Failed to render content")
            }
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ejemplo_core::{NodeId, RenderError, StorageError};

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::MissingField.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::EntityNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::StorageError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_identifiers_message() {
        let err = ApiError::from(EjemploError::from(ValidationError::MissingIdentifiers));
        assert_eq!(err.code, ErrorCode::MissingField);
        assert_eq!(err.message, "You must provide the nodes to get.");
        assert_eq!(err.details, None);
    }

    #[test]
    fn test_invalid_value_names_raw_token() {
        let err = ApiError::from(ValidationError::InvalidIdentifier {
            value: "abc".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid value \"abc\".");
        assert_eq!(err.details, Some(serde_json::json!({ "value": "abc" })));
    }

    #[test]
    fn test_not_found_lists_missing_ids() {
        let missing = [9, 12].into_iter().filter_map(NodeId::new).collect();
        let err = ApiError::from(EjemploError::NotFound { missing });

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Cannot find nodes: 9, 12.");
        assert_eq!(err.details, Some(serde_json::json!({ "missing": [9, 12] })));
    }

    #[test]
    fn test_internal_errors_do_not_leak_details() {
        let err = ApiError::from(EjemploError::from(StorageError::QueryFailed {
            reason: "connection reset by peer".to_string(),
        }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("connection reset"));

        let err = ApiError::from(EjemploError::from(RenderError::Failed {
            id: NodeId::new(3).expect("non-zero id"),
            reason: "template missing".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(!err.message.contains("template"));
    }

    #[test]
    fn test_error_serialization() -> Result<(), serde_json::Error> {
        let err = ApiError::not_found("Cannot find nodes: 9.");
        let json = serde_json::to_string(&err)?;

        assert!(json.contains("ENTITY_NOT_FOUND"));
        assert!(!json.contains("details"));

        let deserialized: ApiError = serde_json::from_str(&json)?;
        assert_eq!(deserialized, err);
        Ok(())
    }

    #[test]
    fn test_error_response_is_uncacheable() {
        let response = ApiError::invalid_input("Invalid value \"x\".").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-cache, private")
        );
    }
}
