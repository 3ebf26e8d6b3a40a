//! CLI argument definitions using clap
//!
//! Commands:
//! - avroscan schema [--file <path>]
//! - avroscan map-table --db <name> --table <name>
//! - avroscan map-database --db <name>
//! - avroscan render --config <path>
//! - avroscan advance --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// avroscan - Avro-style schemas and keyset scans for relational tables
#[derive(Parser, Debug)]
#[command(name = "avroscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log per-statement detail
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a schema and print its canonical JSON
    Schema {
        /// Schema file; stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Map column metadata (JSON array on stdin) to a record schema
    MapTable {
        #[arg(long)]
        db: String,

        #[arg(long)]
        table: String,
    },

    /// Map every table of a catalog (JSON object of table name to column
    /// metadata on stdin) to one record schema per table
    MapDatabase {
        #[arg(long)]
        db: String,
    },

    /// Print the next page statement and its parameters
    Render {
        /// Path to export configuration
        #[arg(long, default_value = "./export.json")]
        config: PathBuf,
    },

    /// Read the last fetched row (JSON array on stdin) and print the next cursor
    Advance {
        /// Path to export configuration
        #[arg(long, default_value = "./export.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
