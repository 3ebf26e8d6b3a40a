//! Observability subsystem
//!
//! Structured, synchronous JSON logging. Logging is read-only: it never
//! alters the result of the operation being logged.
//!
//! # Usage
//!
//! ```ignore
//! use avroscan::observability::{log_event, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event(Event::PageFetched, &[("rows", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event at its default severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
