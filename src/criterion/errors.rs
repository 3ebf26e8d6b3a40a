//! Criterion engine error types
//!
//! Query-building failures surface before any statement reaches the row
//! source. Codec failures on fetched rows abort the whole page.

use thiserror::Error;

use crate::codec::CodecError;
use crate::schema::TypeTag;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriterionError {
    /// No field or alias matches the criterion
    #[error("CRITERION_UNKNOWN_FIELD: {0}")]
    UnknownField(String),

    #[error("UNSUPPORTED_TYPE_FOR_CRITERION: {0}")]
    UnsupportedTypeForCriterion(String),

    #[error("CANNOT_IGNORE_ORDER: a keyset scan needs ascending or descending order")]
    CannotIgnoreOrder,

    /// Criteria in one call disagree on direction
    #[error("MIXED_CRITERION_ORDER: {0}")]
    MixedOrder(String),

    #[error("EXPECT_RECORD_SCHEMA: {0}")]
    ExpectRecordSchema(String),

    /// A limit whose JSON shape does not fit the criterion type
    #[error("INVALID_CRITERION_LIMIT: {0}")]
    InvalidLimit(String),

    #[error("ROW_SOURCE_FAILED: {0}")]
    Source(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl CriterionError {
    pub fn unknown_field(name: &str) -> Self {
        CriterionError::UnknownField(format!("no field or alias named '{}'", name))
    }

    pub fn unsupported(field: &str, tag: TypeTag) -> Self {
        CriterionError::UnsupportedTypeForCriterion(format!(
            "field '{}' of type '{}' cannot bound a scan",
            field, tag
        ))
    }

    pub fn invalid_limit(field: &str, reason: impl std::fmt::Display) -> Self {
        CriterionError::InvalidLimit(format!("field '{}': {}", field, reason))
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            CriterionError::UnknownField(_) => "CRITERION_UNKNOWN_FIELD",
            CriterionError::UnsupportedTypeForCriterion(_) => "UNSUPPORTED_TYPE_FOR_CRITERION",
            CriterionError::CannotIgnoreOrder => "CANNOT_IGNORE_ORDER",
            CriterionError::MixedOrder(_) => "MIXED_CRITERION_ORDER",
            CriterionError::ExpectRecordSchema(_) => "EXPECT_RECORD_SCHEMA",
            CriterionError::InvalidLimit(_) => "INVALID_CRITERION_LIMIT",
            CriterionError::Source(_) => "ROW_SOURCE_FAILED",
            CriterionError::Codec(e) => e.code(),
        }
    }
}

/// Result type for criterion operations
pub type CriterionResult<T> = Result<T, CriterionError>;
