//! Schema error types
//!
//! Error codes:
//! - INVALID_SCHEMA: structurally malformed schema JSON
//! - UNSUPPORTED_TYPE: well-formed but unrecognized type tag

use thiserror::Error;

/// Schema error with the offending detail attached
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Missing required key, wrong JSON kind, negative size/precision/scale,
    /// bad `order` value, non-string alias
    #[error("INVALID_SCHEMA: {0}")]
    InvalidSchema(String),

    /// Type tag that is neither a known type nor an ancestor name
    #[error("UNSUPPORTED_TYPE: {0}")]
    UnsupportedType(String),
}

impl SchemaError {
    /// Create an invalid schema error
    pub fn invalid(reason: impl Into<String>) -> Self {
        SchemaError::InvalidSchema(reason.into())
    }

    /// Create an unsupported type error
    pub fn unsupported(type_name: impl Into<String>) -> Self {
        SchemaError::UnsupportedType(type_name.into())
    }

    /// Create an error for a required key that is absent
    pub fn missing_key(key: &str, context: &str) -> Self {
        SchemaError::InvalidSchema(format!("missing '{}' in {}", key, context))
    }

    /// Create an error for a key holding the wrong JSON kind
    pub fn wrong_kind(key: &str, expected: &str) -> Self {
        SchemaError::InvalidSchema(format!("'{}' must be {}", key, expected))
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidSchema(_) => "INVALID_SCHEMA",
            SchemaError::UnsupportedType(_) => "UNSUPPORTED_TYPE",
        }
    }

    /// Returns true for structural failures
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, SchemaError::InvalidSchema(_))
    }

    /// Returns true for unrecognized type tags
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, SchemaError::UnsupportedType(_))
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
