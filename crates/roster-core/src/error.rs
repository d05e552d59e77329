//! Error types for roster operations.
//!
//! This module provides the error hierarchy for the record and history
//! engines, with structured error codes and suggestions for resolution.

use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for roster operations.
pub type RosterResult<T> = Result<T, RosterError>;

/// Main error type for all roster operations.
#[derive(Error, Debug)]
pub enum RosterError {
    /// A snapshot handed to the diff engine is not a flat mapping of
    /// scalar/date values. This is a programming error, not caller input.
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String, code: ErrorCode },

    /// The operation tag is not one of CREATE, UPDATE, DELETE.
    #[error("Invalid operation: '{operation}'")]
    InvalidOperation { operation: String, code: ErrorCode },

    /// The before/after snapshot pair does not match the operation
    /// (e.g. a CREATE with a prior snapshot).
    #[error("Inconsistent snapshot pair: {message}")]
    InconsistentSnapshotPair { message: String, code: ErrorCode },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        details: HashMap<String, String>,
        suggestion: Option<String>,
    },

    /// Employee record not found.
    #[error("Employee not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        record_id: Option<String>,
    },

    /// A requested version entry does not exist for the record.
    #[error("Version not found: {message}")]
    VersionNotFound {
        message: String,
        code: ErrorCode,
        version_id: Option<String>,
    },

    /// Database operation failed.
    #[error("Database error: {message}")]
    Database {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Snapshot (SNAP_xxx)
    SnapNotFlat,
    SnapBadValue,

    // Versioning (VER_xxx)
    VerInvalidOperation,
    VerInconsistentPair,
    VerNotFound,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,
    ValInvalidFormat,

    // Record (REC_xxx)
    RecNotFound,

    // Database (DB_xxx)
    DbConnectionFailed,
    DbOperationFailed,

    // Parse (PARSE_xxx)
    ParseInvalidValue,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SnapNotFlat => "SNAP_001",
            ErrorCode::SnapBadValue => "SNAP_002",
            ErrorCode::VerInvalidOperation => "VER_001",
            ErrorCode::VerInconsistentPair => "VER_002",
            ErrorCode::VerNotFound => "VER_003",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValInvalidFormat => "VAL_003",
            ErrorCode::RecNotFound => "REC_001",
            ErrorCode::DbConnectionFailed => "DB_001",
            ErrorCode::DbOperationFailed => "DB_002",
            ErrorCode::ParseInvalidValue => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RosterError {
    /// Create an invalid snapshot error.
    pub fn invalid_snapshot(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
            code: ErrorCode::SnapNotFlat,
        }
    }

    /// Create an invalid operation error.
    pub fn invalid_operation(operation: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation: operation.into(),
            code: ErrorCode::VerInvalidOperation,
        }
    }

    /// Create an inconsistent snapshot pair error.
    pub fn inconsistent_pair(message: impl Into<String>) -> Self {
        Self::InconsistentSnapshotPair {
            message: message.into(),
            code: ErrorCode::VerInconsistentPair,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: None,
        }
    }

    /// Create a validation error with a suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            details: HashMap::new(),
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a missing field validation error.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            message: format!("Field '{}' is required", field),
            code: ErrorCode::ValMissingField,
            details: HashMap::from([(field.to_string(), "missing".to_string())]),
            suggestion: None,
        }
    }

    /// Create a record not found error.
    pub fn not_found(record_id: impl Into<String>) -> Self {
        let id = record_id.into();
        Self::NotFound {
            message: format!("Employee with id '{}' not found", id),
            code: ErrorCode::RecNotFound,
            record_id: Some(id),
        }
    }

    /// Create a version not found error.
    pub fn version_not_found(version_id: impl Into<String>) -> Self {
        let id = version_id.into();
        Self::VersionNotFound {
            message: format!("Version with id '{}' not found for this employee", id),
            code: ErrorCode::VerNotFound,
            version_id: Some(id),
        }
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::DbOperationFailed,
            source: None,
        }
    }

    /// Create a parse error for values read back from storage.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: ErrorCode::ParseInvalidValue,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidSnapshot { code, .. } => *code,
            Self::InvalidOperation { code, .. } => *code,
            Self::InconsistentSnapshotPair { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::VersionNotFound { code, .. } => *code,
            Self::Database { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidOperation { .. } => {
                Some("Operation must be one of CREATE, UPDATE, DELETE")
            }
            Self::NotFound { .. } => Some("Please check the employee ID and ensure it exists"),
            Self::VersionNotFound { .. } => {
                Some("Please check that the version ID belongs to this employee")
            }
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RosterError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            code: ErrorCode::DbOperationFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_operation_error() {
        let err = RosterError::invalid_operation("MERGE");
        assert_eq!(err.code(), ErrorCode::VerInvalidOperation);
        assert!(err.to_string().contains("MERGE"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_not_found_error() {
        let err = RosterError::not_found("test-id");
        assert_eq!(err.code(), ErrorCode::RecNotFound);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::SnapNotFlat.as_str(), "SNAP_001");
        assert_eq!(ErrorCode::VerNotFound.as_str(), "VER_003");
        assert_eq!(ErrorCode::RecNotFound.as_str(), "REC_001");
    }
}
