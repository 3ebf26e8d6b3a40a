//! Export configuration
//!
//! Validated settings for an export job: source database, record schema,
//! page size, starting cursor, and the container options the exporter
//! applies to each page.

mod config;
mod errors;

pub use config::{Compression, ExportConfig, OutputFormat};
pub use errors::{ExportError, ExportResult};
