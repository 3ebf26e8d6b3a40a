//! CLI command implementations
//!
//! Every command is one-shot: read its inputs, print one JSON document,
//! exit. None of them opens a database connection.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_stdin, write_json, write_response};
use crate::codec::SqlValue;
use crate::criterion::{advance_cursor, expect_record, render_query, FetchResult, Statement};
use crate::export::ExportConfig;
use crate::mapper::{describe_database, map_table, ColumnDescriptor, TABLES_QUERY};
use crate::observability::{Logger, Severity};
use crate::schema::{self, Schema};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    if cli.trace {
        Logger::set_min_severity(Severity::Trace);
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Schema { file } => schema_cmd(file.as_deref()),
        Command::MapTable { db, table } => map_table_cmd(&db, &table),
        Command::MapDatabase { db } => map_database_cmd(&db),
        Command::Render { config } => render_cmd(&config),
        Command::Advance { config } => advance_cmd(&config),
    }
}

/// Parse a schema and print its canonical JSON
pub fn schema_cmd(file: Option<&Path>) -> CliResult<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)?,
        None => read_stdin()?,
    };
    write_json(&canonical_schema(&text)?)
}

/// Map `INFORMATION_SCHEMA.COLUMNS` descriptors read from stdin
pub fn map_table_cmd(db: &str, table: &str) -> CliResult<()> {
    let columns: Vec<ColumnDescriptor> = serde_json::from_value(read_request()?)?;
    write_json(&table_schema(db, table, &columns)?)
}

/// Map a catalog read from stdin: `{"<table>": [<column>, ...], ...}`
pub fn map_database_cmd(db: &str) -> CliResult<()> {
    let catalog = catalog_from_json(read_request()?)?;
    write_json(&database_schemas(db, &catalog)?)
}

/// Print the statement for the configured cursor
pub fn render_cmd(config_path: &Path) -> CliResult<()> {
    let config = ExportConfig::load(config_path)?;
    let schema = config.record_schema()?;
    let statement = render_query(&config.db_name, &schema, config.limit, &config.criteria)?;
    write_response(&statement_json(&statement))
}

/// Print the cursor following the row read from stdin
pub fn advance_cmd(config_path: &Path) -> CliResult<()> {
    let config = ExportConfig::load(config_path)?;
    let schema = config.record_schema()?;
    let record = expect_record(&schema)?;
    let row = row_from_json(&read_request()?)?;
    let next = advance_cursor(record, &row, &config.criteria)?;
    write_response(&serde_json::to_value(next)?)
}

fn canonical_schema(text: &str) -> CliResult<String> {
    let parsed = schema::parse_str(text, &[])?;
    Ok(schema::to_json_string(&parsed)?)
}

fn table_schema(db: &str, table: &str, columns: &[ColumnDescriptor]) -> CliResult<String> {
    let record = map_table(db, table, columns)?;
    Ok(schema::to_json_string(&Schema::Record(record))?)
}

type Catalog = Vec<(String, Vec<ColumnDescriptor>)>;

fn catalog_from_json(value: Value) -> CliResult<Catalog> {
    let Value::Object(tables) = value else {
        return Err(CliError::input_error("catalog must be a JSON object of tables"));
    };
    tables
        .into_iter()
        .map(|(table, columns)| -> CliResult<(String, Vec<ColumnDescriptor>)> {
            Ok((table, serde_json::from_value(columns)?))
        })
        .collect()
}

/// Maps the catalog through the same metadata statements a live database
/// would answer
fn database_schemas(db: &str, catalog: &Catalog) -> CliResult<String> {
    let mut source = |statement: &str, params: &[SqlValue]| -> FetchResult {
        if statement == TABLES_QUERY {
            return Ok(catalog
                .iter()
                .map(|(table, _)| vec![SqlValue::from(table.as_str())])
                .collect());
        }
        let wanted = match params {
            [_, SqlValue::Text(table)] => table.as_str(),
            other => return Err(format!("unexpected metadata parameters {:?}", other)),
        };
        Ok(catalog
            .iter()
            .filter(|(table, _)| table == wanted)
            .flat_map(|(_, columns)| columns.iter().map(ColumnDescriptor::to_row))
            .collect())
    };
    let documents = describe_database(&mut source, db)?
        .into_iter()
        .map(|record| schema::to_json_string(&Schema::Record(record)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", documents.join(",")))
}

fn statement_json(statement: &Statement) -> Value {
    let params: Vec<Value> = statement.params.iter().map(param_json).collect();
    json!({
        "statement": statement.text,
        "params": params,
    })
}

fn param_json(param: &SqlValue) -> Value {
    match param {
        SqlValue::Null => Value::Null,
        SqlValue::Int(v) => json!(v),
        SqlValue::Float(v) => json!(v),
        SqlValue::Text(v) => json!(v),
        SqlValue::Bytes(v) => json!(v),
    }
}

/// JSON array of scalars to driver values
fn row_from_json(value: &Value) -> CliResult<Vec<SqlValue>> {
    let cells = value
        .as_array()
        .ok_or_else(|| CliError::input_error("row must be a JSON array"))?;
    cells
        .iter()
        .map(|cell| match cell {
            Value::Null => Ok(SqlValue::Null),
            Value::String(s) => Ok(SqlValue::Text(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(SqlValue::Int)
                .or_else(|| n.as_f64().map(SqlValue::Float))
                .ok_or_else(|| CliError::input_error(format!("unsupported number {}", n))),
            other => Err(CliError::input_error(format!("unsupported cell {}", other))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_schema_reorders_keys() {
        let text = r#"{"name":"t","type":"record","fields":[{"type":"int","name":"id"}]}"#;
        assert_eq!(
            canonical_schema(text).unwrap(),
            r#"{"type":"record","name":"t","fields":[{"name":"id","type":"int"}]}"#
        );
        assert!(canonical_schema(r#"{"type":"tuple"}"#).is_err());
    }

    #[test]
    fn test_table_schema() {
        let columns = vec![ColumnDescriptor::new("id", "int")];
        assert_eq!(
            table_schema("shop", "t", &columns).unwrap(),
            r#"{"type":"record","namespace":"shop","name":"t","fields":[{"name":"id","type":"int"}]}"#
        );
    }

    #[test]
    fn test_database_schemas_in_catalog_order() {
        let catalog = catalog_from_json(json!({
            "users": [{"name": "id", "data_type": "bigint"}],
            "audit log": [
                {"name": "at", "data_type": "timestamp"},
                {"name": "note", "data_type": "text", "nullable": true}
            ]
        }))
        .unwrap();
        assert_eq!(
            database_schemas("app", &catalog).unwrap(),
            concat!(
                r#"[{"type":"record","namespace":"app","name":"users","fields":[{"name":"id","type":"long"}]},"#,
                r#"{"type":"record","namespace":"app","name":"auditlog","aliases":["audit log"],"fields":["#,
                r#"{"name":"at","type":{"type":"int","logicalType":"timestamp"}},"#,
                r#"{"name":"note","type":["null","string"]}]}]"#
            )
        );
        assert_eq!(database_schemas("app", &Vec::new()).unwrap(), "[]");
    }

    #[test]
    fn test_catalog_must_be_object() {
        assert!(catalog_from_json(json!([{"name": "id"}])).is_err());
        assert!(catalog_from_json(json!({"t": [{"name": "id"}]})).is_err());
    }

    #[test]
    fn test_statement_json() {
        let statement = Statement {
            text: "SELECT 1 LIMIT ?".to_string(),
            params: vec![SqlValue::from("a"), SqlValue::Int(5)],
        };
        assert_eq!(
            statement_json(&statement),
            json!({"statement": "SELECT 1 LIMIT ?", "params": ["a", 5]})
        );
    }

    #[test]
    fn test_row_from_json() {
        let row = row_from_json(&json!([1, 2.5, "x", null])).unwrap();
        assert_eq!(
            row,
            vec![
                SqlValue::Int(1),
                SqlValue::Float(2.5),
                SqlValue::from("x"),
                SqlValue::Null
            ]
        );
        assert!(row_from_json(&json!({"a": 1})).is_err());
        assert!(row_from_json(&json!([[1]])).is_err());
    }
}
