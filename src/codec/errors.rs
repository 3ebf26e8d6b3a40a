//! Value codec error types
//!
//! Error codes:
//! - UNSUPPORTED_TYPE_FOR_SQL: schema shape the codec cannot read from a column
//! - UNSUPPORTED_TYPE_FOR_CRITERION: schema type with no limit encoding
//! - INVALID_VALUE: fetched value that does not fit its schema

use thiserror::Error;

use crate::schema::TypeTag;

/// Value codec error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("UNSUPPORTED_TYPE_FOR_SQL: {0}")]
    UnsupportedTypeForSql(String),

    #[error("UNSUPPORTED_TYPE_FOR_CRITERION: {0}")]
    UnsupportedTypeForCriterion(String),

    #[error("INVALID_VALUE: {0}")]
    InvalidValue(String),
}

impl CodecError {
    /// Create an unsupported-for-SQL error for a type tag
    pub fn unsupported_for_sql(tag: TypeTag) -> Self {
        CodecError::UnsupportedTypeForSql(format!("cannot read '{}' from a column", tag))
    }

    /// Create an unsupported-for-criterion error for a type tag
    pub fn unsupported_for_criterion(tag: TypeTag) -> Self {
        CodecError::UnsupportedTypeForCriterion(format!("'{}' has no limit encoding", tag))
    }

    /// Create an invalid value error
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        CodecError::InvalidValue(reason.into())
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::UnsupportedTypeForSql(_) => "UNSUPPORTED_TYPE_FOR_SQL",
            CodecError::UnsupportedTypeForCriterion(_) => "UNSUPPORTED_TYPE_FOR_CRITERION",
            CodecError::InvalidValue(_) => "INVALID_VALUE",
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
