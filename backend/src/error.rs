//! Error types for the field-mapping transformer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`TransformError`] - Field-level error reported inside a failed [`crate::TransformResult`]
//! - [`CoercionError`] - A mapping rule's transform function rejected its input
//! - [`RegistryError`] - Mapping files could not be loaded
//! - [`ServerError`] - HTTP layer errors
//!
//! Field-level errors are data: they are collected and returned, never raised
//! across the public transform functions. The other types are regular errors
//! and convert via `From`, allowing `?` to work across boundaries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// =============================================================================
// Field-level Errors
// =============================================================================

/// Category of a field-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No mapping registered for the platform/record kind.
    UnsupportedPlatform,
    /// A field marked required by at least one rule never resolved.
    RequiredMissing,
    /// A rule's transform failed; extraction moved on to the next rule.
    TransformError,
    /// A field of the fixed required list is absent from the assembled record.
    ValidationMissing,
    /// Catch-all for failures outside field extraction.
    Transformation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
            Self::RequiredMissing => "REQUIRED_MISSING",
            Self::TransformError => "TRANSFORM_ERROR",
            Self::ValidationMissing => "VALIDATION_MISSING",
            Self::Transformation => "TRANSFORMATION",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-level failure.
///
/// Several of these may accumulate for one transform call.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{kind} on field '{field}': {message}")]
pub struct TransformError {
    /// Target field (or `platform` / `record` for whole-call failures).
    pub field: String,
    /// Error category.
    pub kind: ErrorKind,
    /// What the field was expected to be (`required`, `number`, ...).
    pub expected_type: String,
    /// The offending raw value, `null` when there was none.
    pub actual_value: Value,
    /// Human-readable description.
    pub message: String,
}

impl TransformError {
    pub fn unsupported_platform(platform: &str, kind: &str) -> Self {
        Self {
            field: "platform".to_string(),
            kind: ErrorKind::UnsupportedPlatform,
            expected_type: "supported platform".to_string(),
            actual_value: Value::String(platform.to_string()),
            message: format!("Unsupported platform '{}' for {} records", platform, kind),
        }
    }

    pub fn required_missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: ErrorKind::RequiredMissing,
            expected_type: "required".to_string(),
            actual_value: Value::Null,
            message: format!("Required field '{}' not found in any source", field),
        }
    }

    pub fn transform_failed(field: &str, expected: &str, actual: &Value, err: &CoercionError) -> Self {
        Self {
            field: field.to_string(),
            kind: ErrorKind::TransformError,
            expected_type: expected.to_string(),
            actual_value: actual.clone(),
            message: format!("Transform failed for field '{}': {}", field, err),
        }
    }

    pub fn validation_missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: ErrorKind::ValidationMissing,
            expected_type: "present".to_string(),
            actual_value: Value::Null,
            message: format!("Missing required field: {}", field),
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        Self {
            field: "record".to_string(),
            kind: ErrorKind::Transformation,
            expected_type: "record".to_string(),
            actual_value: Value::Null,
            message: message.into(),
        }
    }
}

// =============================================================================
// Coercion Errors
// =============================================================================

/// A transform function could not handle its input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// The value has the wrong JSON type for this transform.
    #[error("expected {expected}, got {actual}")]
    WrongType { expected: &'static str, actual: &'static str },
}

impl CoercionError {
    pub fn wrong_type(expected: &'static str, value: &Value) -> Self {
        Self::WrongType {
            expected,
            actual: json_type_name(value),
        }
    }
}

/// JSON type name used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Errors while loading platform mappings.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Mapping file or directory could not be read.
    #[error("Registry IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Mapping file is not valid JSON for a platform mapping.
    #[error("Invalid mapping file {path}: {source}")]
    InvalidFile {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Mapping parsed but is unusable.
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transform functions.
pub type CoercionResult<T> = Result<T, CoercionError>;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
