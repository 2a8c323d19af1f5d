//! Error Types for the Stockroom API
//!
//! This module defines error handling for the HTTP layer:
//! - ErrorCode enum mapping each failure category to a status code
//! - ApiError struct serialized as the JSON error body
//! - Conversions from domain, storage and driver errors
//!
//! The body shape is `{"error": <message>, "code": <CODE>, "details"?: ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use stockroom_core::{
    IdentifierError, RecordKind, StockroomError, StorageError, ValidationError,
};

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Path identifier is not a well-formed record id
    InvalidIdentifier,

    /// Request body failed validation or type coercion
    ValidationFailed,

    /// Request body is not valid JSON for the endpoint
    InvalidInput,

    /// Required field is missing or blank
    MissingField,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    ComponentNotFound,

    ProductNotFound,

    /// Product exists but has no component entry with the given id
    ProductComponentNotFound,

    /// No route matches the request
    RouteNotFound,

    // ========================================================================
    // Conflict Errors (409)
    // ========================================================================
    EntityAlreadyExists,

    /// Optimistic write kept losing to concurrent writers
    ConcurrentModification,

    // ========================================================================
    // Server Errors (500, 503, 504)
    // ========================================================================
    InternalError,

    DatabaseError,

    /// Record store unreachable or its pool saturated
    ConnectionPoolExhausted,

    Timeout,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidIdentifier
            | ErrorCode::ValidationFailed
            | ErrorCode::InvalidInput
            | ErrorCode::MissingField => StatusCode::BAD_REQUEST,

            ErrorCode::ComponentNotFound
            | ErrorCode::ProductNotFound
            | ErrorCode::ProductComponentNotFound
            | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,

            ErrorCode::EntityAlreadyExists | ErrorCode::ConcurrentModification => {
                StatusCode::CONFLICT
            }

            ErrorCode::ConnectionPoolExhausted => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,

            ErrorCode::InternalError | ErrorCode::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::InvalidIdentifier => "Invalid ID",
            ErrorCode::ValidationFailed => "Request validation failed",
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",

            ErrorCode::ComponentNotFound => "Component not found",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductComponentNotFound => "Component not found in product",
            ErrorCode::RouteNotFound => "Route not found",

            ErrorCode::EntityAlreadyExists => "Entity already exists",
            ErrorCode::ConcurrentModification => "Concurrent modification detected",

            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database operation failed",
            ErrorCode::ConnectionPoolExhausted => "Connection pool exhausted",
            ErrorCode::Timeout => "Operation timed out",
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
    /// Human-readable error message
    #[serde(rename = "error")]
    pub message: String,

    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Optional additional details (field errors and the like)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            details: None,
        }
    }

    /// Create an error with the code's default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code, code.default_message())
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// Malformed id for the named entity, e.g. "Invalid component ID".
    pub fn invalid_identifier(entity_name: &str, err: &IdentifierError) -> Self {
        Self::new(
            ErrorCode::InvalidIdentifier,
            format!("Invalid {} ID", entity_name),
        )
        .with_details(serde_json::json!({ "reason": err.to_string() }))
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    pub fn component_not_found() -> Self {
        Self::from_code(ErrorCode::ComponentNotFound)
    }

    pub fn product_not_found() -> Self {
        Self::from_code(ErrorCode::ProductNotFound)
    }

    pub fn product_component_not_found() -> Self {
        Self::from_code(ErrorCode::ProductComponentNotFound)
    }

    pub fn route_not_found() -> Self {
        Self::from_code(ErrorCode::RouteNotFound)
    }

    pub fn entity_already_exists(entity_type: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EntityAlreadyExists,
            format!("{} with id {} already exists", entity_type, id),
        )
    }

    pub fn concurrent_modification(entity_type: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConcurrentModification,
            format!("{} {} was modified by another request", entity_type, id),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn connection_pool_exhausted() -> Self {
        Self::from_code(ErrorCode::ConnectionPoolExhausted)
    }

    pub fn timeout() -> Self {
        Self::from_code(ErrorCode::Timeout)
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

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::RequiredFieldMissing { field } => ApiError::missing_field(field),
            ValidationError::InvalidValue { field, .. } => ApiError::validation_failed(err.to_string())
                .with_details(serde_json::json!({ "field": field })),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound {
                kind: RecordKind::Component,
                ..
            } => ApiError::component_not_found(),
            StorageError::NotFound {
                kind: RecordKind::Product,
                ..
            } => ApiError::product_not_found(),
            StorageError::VersionConflict { kind, id, .. } => {
                ApiError::concurrent_modification(&kind.to_string(), id)
            }
            StorageError::AlreadyExists { kind, id } => {
                ApiError::entity_already_exists(&kind.to_string(), id)
            }
            StorageError::Unavailable { reason } => {
                tracing::error!(reason = %reason, "Record store unavailable");
                ApiError::connection_pool_exhausted()
            }
            StorageError::Backend { reason } => {
                // Full detail stays in the log; clients get a generic body.
                tracing::error!(reason = %reason, "Record store failure");
                ApiError::database_error(ErrorCode::DatabaseError.default_message())
            }
        }
    }
}

impl From<StockroomError> for ApiError {
    fn from(err: StockroomError) -> Self {
        match err {
            StockroomError::Storage(e) => e.into(),
            StockroomError::Validation(e) => e.into(),
            StockroomError::Identifier(e) => ApiError::invalid_identifier("record", &e),
        }
    }
}

// ============================================================================
// CONVERSIONS FROM DRIVER ERRORS
// ============================================================================

impl From<rust_xlsxwriter::XlsxError> for ApiError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        tracing::error!("Spreadsheet export error: {:?}", err);
        ApiError::internal_error("Failed to build spreadsheet")
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
