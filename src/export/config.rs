//! Export configuration
//!
//! JSON document handed to the exporter:
//!
//! ```json
//! {
//!   "connection": "user:pass@tcp(localhost:3306)/shop",
//!   "dbName": "shop",
//!   "recordSchema": {"type": "record", "name": "orders", "fields": []},
//!   "limit": 10000,
//!   "criteria": [{"field": "id", "limit": 0}],
//!   "compressionCodec": "null",
//!   "outputFormat": "avro",
//!   "csvSeparator": ";"
//! }
//! ```
//!
//! Only `connection`, `dbName` and `recordSchema` are required.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ExportError, ExportResult};
use crate::criterion::{render_query, Criterion, Pager, RowSource};
use crate::observability::{log_event, Event};
use crate::schema::{self, Schema};

/// Block compression of the container output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    Null,
    Deflate,
    Snappy,
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            Compression::Null => "null",
            Compression::Deflate => "deflate",
            Compression::Snappy => "snappy",
        }
    }
}

impl FromStr for Compression {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" | "" => Ok(Compression::Null),
            "deflate" => Ok(Compression::Deflate),
            "snappy" => Ok(Compression::Snappy),
            other => Err(ExportError::UnsupportedCompression(other.to_string())),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Avro,
    Csv,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Avro => "avro",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avro" => Ok(OutputFormat::Avro),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(ExportError::UnsupportedOutput(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Export job configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    /// Driver connection string, passed through untouched
    pub connection: String,

    pub db_name: String,

    /// Avro schema JSON of the exported table
    pub record_schema: Value,

    /// Rows per page (default 10000)
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Starting cursor (default: none, one unbounded page)
    #[serde(default)]
    pub criteria: Vec<Criterion>,

    /// "null", "deflate" or "snappy" (default "null")
    #[serde(default = "default_compression")]
    pub compression_codec: String,

    /// "avro" or "csv" (default "avro")
    #[serde(default = "default_output_format")]
    pub output_format: String,

    #[serde(default = "default_csv_separator")]
    pub csv_separator: char,
}

fn default_limit() -> u64 {
    10_000
}
fn default_compression() -> String {
    Compression::Null.name().to_string()
}
fn default_output_format() -> String {
    OutputFormat::Avro.name().to_string()
}
fn default_csv_separator() -> char {
    ';'
}

impl ExportConfig {
    /// Parses and validates a configuration document
    pub fn from_json(text: &str) -> ExportResult<Self> {
        let result = serde_json::from_str::<ExportConfig>(text)
            .map_err(|e| ExportError::invalid(format!("invalid config JSON: {}", e)))
            .and_then(|config| config.validate().map(|_| config));

        match &result {
            Ok(config) => log_event(
                Event::ExportConfigLoaded,
                &[
                    ("compression", &config.compression_codec),
                    ("db", &config.db_name),
                    ("output", &config.output_format),
                ],
            ),
            Err(e) => log_event(
                Event::ExportConfigRejected,
                &[("code", e.code()), ("reason", &e.to_string())],
            ),
        }
        result
    }

    /// Loads a configuration file
    pub fn load(path: &Path) -> ExportResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExportError::invalid(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Checks every setting, including that the criteria render against
    /// the record schema.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for an empty connection or database, zero limit or
    ///   an unusable separator
    /// - `UnsupportedCompression` / `UnsupportedOutput`
    /// - `ExpectRecordSchema` when the schema is not a record
    /// - schema and criterion errors
    pub fn validate(&self) -> ExportResult<()> {
        if self.connection.trim().is_empty() {
            return Err(ExportError::invalid("connection must not be empty"));
        }
        if self.db_name.trim().is_empty() {
            return Err(ExportError::invalid("dbName must not be empty"));
        }
        if self.limit == 0 {
            return Err(ExportError::invalid("limit must be > 0"));
        }
        self.compression()?;
        if self.output()? == OutputFormat::Csv
            && matches!(self.csv_separator, '"' | '\n' | '\r')
        {
            return Err(ExportError::invalid(format!(
                "csvSeparator {:?} is not usable",
                self.csv_separator
            )));
        }

        let schema = self.record_schema()?;
        render_query(&self.db_name, &schema, self.limit, &self.criteria)?;
        Ok(())
    }

    pub fn compression(&self) -> ExportResult<Compression> {
        self.compression_codec.parse()
    }

    pub fn output(&self) -> ExportResult<OutputFormat> {
        self.output_format.parse()
    }

    /// Parses the embedded schema, which must be a record
    pub fn record_schema(&self) -> ExportResult<Schema> {
        let schema = schema::parse_value(&self.record_schema, &[])?;
        if schema.as_record().is_none() {
            return Err(ExportError::ExpectRecordSchema(format!(
                "got '{}'",
                schema.type_tag()
            )));
        }
        Ok(schema)
    }

    /// Pager over `source` starting at the configured criteria.
    ///
    /// `schema` is normally the result of [`ExportConfig::record_schema`].
    pub fn pager<'a, S: RowSource + ?Sized>(
        &self,
        source: &'a mut S,
        schema: &'a Schema,
    ) -> ExportResult<Pager<'a, S>> {
        Ok(Pager::new(
            source,
            self.db_name.clone(),
            schema,
            self.limit,
            self.criteria.clone(),
        )?)
    }
}
