//! CLI module for avroscan
//!
//! Provides command-line access to:
//! - schema: canonical re-serialization of a schema document
//! - map-table: column metadata to record schema
//! - map-database: column metadata of many tables to one schema per table
//! - render: page statement for an export configuration
//! - advance: next cursor from a fetched row

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    advance_cmd, map_database_cmd, map_table_cmd, render_cmd, run, run_command, schema_cmd,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_stdin, write_json, write_response};
