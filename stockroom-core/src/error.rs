//! Error types for stockroom operations

use thiserror::Error;

use crate::identity::RecordId;

/// Record kind discriminator used in storage errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Component,
    Product,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Component => f.write_str("component"),
            RecordKind::Product => f.write_str("product"),
        }
    }
}

/// Malformed record identifier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier '{value}' has length {len}, expected 24")]
    Length { value: String, len: usize },

    #[error("identifier '{value}' is not hexadecimal")]
    NotHex { value: String },
}

/// Record store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: RecordId },

    #[error("{kind} {id} was written concurrently (expected version {expected})")]
    VersionConflict {
        kind: RecordKind,
        id: RecordId,
        expected: u64,
    },

    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: RecordKind, id: RecordId },

    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Store backend error: {reason}")]
    Backend { reason: String },
}

impl StorageError {
    pub fn backend(reason: impl std::fmt::Display) -> Self {
        Self::Backend {
            reason: reason.to_string(),
        }
    }
}

/// Input validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Master error type for stockroom domain and storage errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockroomError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Identifier error: {0}")]
    Identifier(#[from] IdentifierError),
}

/// Result type alias for record store operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_not_found() {
        let id = RecordId::from_bytes([0xab; 12]);
        let err = StorageError::NotFound {
            kind: RecordKind::Product,
            id,
        };
        let msg = err.to_string();
        assert!(msg.contains("product"));
        assert!(msg.contains("abababababababababababab"));
    }

    #[test]
    fn test_validation_error_constructors() {
        assert_eq!(
            ValidationError::missing("productName").to_string(),
            "Required field missing: productName"
        );
        let err = ValidationError::invalid("priceInr", "must be non-negative");
        assert!(err.to_string().contains("priceInr"));
    }

    #[test]
    fn test_stockroom_error_from_variants() {
        let err: StockroomError = ValidationError::missing("category").into();
        assert!(matches!(err, StockroomError::Validation(_)));

        let err: StockroomError = IdentifierError::NotHex {
            value: "x".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Identifier error"));
    }
}
