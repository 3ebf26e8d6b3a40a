//! Mapper error types
//!
//! Mapping itself fails only with schema errors. Reading column metadata
//! through a row source adds source and value failures.

use thiserror::Error;

use crate::schema::SchemaError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("ROW_SOURCE_FAILED: {0}")]
    Source(String),

    /// Metadata row with an unexpected shape
    #[error("INVALID_COLUMN_METADATA: {0}")]
    InvalidMetadata(String),

    #[error("UNKNOWN_TABLE: {0}")]
    UnknownTable(String),
}

impl MapperError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            MapperError::Schema(e) => e.code(),
            MapperError::Source(_) => "ROW_SOURCE_FAILED",
            MapperError::InvalidMetadata(_) => "INVALID_COLUMN_METADATA",
            MapperError::UnknownTable(_) => "UNKNOWN_TABLE",
        }
    }
}

/// Result type for mapper operations
pub type MapperResult<T> = Result<T, MapperError>;
