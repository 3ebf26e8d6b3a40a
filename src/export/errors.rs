//! Export configuration error types

use thiserror::Error;

use crate::criterion::CriterionError;
use crate::schema::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("UNSUPPORTED_COMPRESSION: '{0}' (expected null, deflate or snappy)")]
    UnsupportedCompression(String),

    #[error("UNSUPPORTED_OUTPUT: '{0}' (expected avro or csv)")]
    UnsupportedOutput(String),

    #[error("EXPECT_RECORD_SCHEMA: {0}")]
    ExpectRecordSchema(String),

    /// Unreadable file, malformed JSON or a missing or empty setting
    #[error("INVALID_EXPORT_CONFIG: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Criterion(#[from] CriterionError),
}

impl ExportError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ExportError::InvalidConfig(reason.into())
    }

    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::UnsupportedCompression(_) => "UNSUPPORTED_COMPRESSION",
            ExportError::UnsupportedOutput(_) => "UNSUPPORTED_OUTPUT",
            ExportError::ExpectRecordSchema(_) => "EXPECT_RECORD_SCHEMA",
            ExportError::InvalidConfig(_) => "INVALID_EXPORT_CONFIG",
            ExportError::Schema(e) => e.code(),
            ExportError::Criterion(e) => e.code(),
        }
    }
}

/// Result type for export configuration
pub type ExportResult<T> = Result<T, ExportError>;
