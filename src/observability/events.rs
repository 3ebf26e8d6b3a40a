//! Observable events
//!
//! Events are explicit and typed. Each carries its default severity.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Schema
    /// Schema JSON parsed
    SchemaParsed,
    /// Relational table mapped to a record schema
    TableMapped,
    /// Every table of a database mapped
    DatabaseMapped,

    // Scan
    /// Paginated statement rendered
    QueryRendered,
    /// One page fetched and encoded
    PageFetched,
    /// Cursor advanced past a page
    CursorAdvanced,
    /// Scan drained
    ScanComplete,

    // Configuration
    /// Export configuration loaded and validated
    ExportConfigLoaded,
    /// Export configuration rejected
    ExportConfigRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SchemaParsed => "SCHEMA_PARSED",
            Event::TableMapped => "TABLE_MAPPED",
            Event::DatabaseMapped => "DATABASE_MAPPED",
            Event::QueryRendered => "QUERY_RENDERED",
            Event::PageFetched => "PAGE_FETCHED",
            Event::CursorAdvanced => "CURSOR_ADVANCED",
            Event::ScanComplete => "SCAN_COMPLETE",
            Event::ExportConfigLoaded => "EXPORT_CONFIG_LOADED",
            Event::ExportConfigRejected => "EXPORT_CONFIG_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SchemaParsed | Event::QueryRendered | Event::CursorAdvanced => Severity::Trace,
            Event::TableMapped
            | Event::DatabaseMapped
            | Event::PageFetched
            | Event::ScanComplete
            | Event::ExportConfigLoaded => Severity::Info,
            Event::ExportConfigRejected => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
