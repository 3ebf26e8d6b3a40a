//! CLI-specific error types

use std::fmt;
use std::io;

use crate::criterion::CriterionError;
use crate::export::ExportError;
use crate::mapper::MapperError;
use crate::schema::SchemaError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file rejected
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Malformed stdin document
    InputError,
    /// The requested operation failed
    OperationFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "AVROSCAN_CLI_CONFIG_ERROR",
            Self::IoError => "AVROSCAN_CLI_IO_ERROR",
            Self::InputError => "AVROSCAN_CLI_INPUT_ERROR",
            Self::OperationFailed => "AVROSCAN_CLI_OPERATION_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn input_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InputError, msg)
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::OperationFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::input_error(format!("JSON error: {}", e))
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::failed(e.to_string())
    }
}

impl From<MapperError> for CliError {
    fn from(e: MapperError) -> Self {
        Self::failed(e.to_string())
    }
}

impl From<CriterionError> for CliError {
    fn from(e: CriterionError) -> Self {
        Self::failed(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
