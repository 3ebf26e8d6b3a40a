//! JSON I/O handling for CLI
//!
//! - Input: one JSON document on stdin
//! - Output: one JSON document per line on stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read all of stdin as text
pub fn read_stdin() -> CliResult<String> {
    let mut text = String::new();
    io::stdin().lock().read_to_string(&mut text)?;
    if text.trim().is_empty() {
        return Err(CliError::input_error("Empty input"));
    }
    Ok(text)
}

/// Read one JSON document from stdin
pub fn read_request() -> CliResult<Value> {
    let text = read_stdin()?;
    Ok(serde_json::from_str(&text)?)
}

/// Write a JSON value to stdout
pub fn write_response(data: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, data)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write an already serialized JSON string to stdout
pub fn write_json(json_str: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", json_str)?;
    stdout.flush()?;
    Ok(())
}
