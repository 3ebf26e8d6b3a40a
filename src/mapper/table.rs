//! Table to record mapping

use super::column::{sanitize_name, ColumnDescriptor};
use super::errors::{MapperError, MapperResult};
use crate::codec::SqlValue;
use crate::criterion::RowSource;
use crate::observability::{log_event, Event};
use crate::schema::{RecordSchema, SchemaResult};

/// Statement listing a table's columns in ordinal order.
///
/// Parameters: schema (database) name, table name.
pub const COLUMNS_QUERY: &str = "SELECT COLUMN_NAME,DATA_TYPE,IS_NULLABLE,COLUMN_DEFAULT,\
NUMERIC_PRECISION,NUMERIC_SCALE,CHARACTER_OCTET_LENGTH \
FROM INFORMATION_SCHEMA.COLUMNS WHERE TABLE_SCHEMA=? AND TABLE_NAME=? \
ORDER BY ORDINAL_POSITION";

/// Statement listing a database's tables.
///
/// Parameter: schema (database) name.
pub const TABLES_QUERY: &str = "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
WHERE TABLE_SCHEMA=? ORDER BY TABLE_NAME";

/// Maps a table's columns to a record.
///
/// The record is named after the table and namespaced by the database;
/// fields follow column order.
pub fn map_table(
    db_name: &str,
    table_name: &str,
    columns: &[ColumnDescriptor],
) -> SchemaResult<RecordSchema> {
    let fields = columns
        .iter()
        .map(ColumnDescriptor::to_field)
        .collect::<SchemaResult<Vec<_>>>()?;

    let name = sanitize_name(table_name)?;
    let mut record = RecordSchema::new(name.clone(), fields)?.with_namespace(db_name);
    if name != table_name {
        record = record.with_aliases(vec![table_name.to_string()]);
    }

    let field_count = record.fields().len().to_string();
    log_event(
        Event::TableMapped,
        &[
            ("db", db_name),
            ("fields", &field_count),
            ("table", table_name),
        ],
    );

    Ok(record)
}

/// Reads a table's column metadata through `source` and maps it.
///
/// # Errors
///
/// - `UnknownTable` if the table has no columns
/// - `Source` if the metadata query fails
/// - `InvalidMetadata` for rows of an unexpected shape
/// - schema errors from column mapping
pub fn describe_table<S: RowSource + ?Sized>(
    source: &mut S,
    db_name: &str,
    table_name: &str,
) -> MapperResult<RecordSchema> {
    let params = [SqlValue::from(db_name), SqlValue::from(table_name)];
    let rows = source
        .fetch(COLUMNS_QUERY, &params)
        .map_err(MapperError::Source)?;
    if rows.is_empty() {
        return Err(MapperError::UnknownTable(format!("{}.{}", db_name, table_name)));
    }
    let columns = rows
        .into_iter()
        .map(descriptor_from_row)
        .collect::<MapperResult<Vec<_>>>()?;
    Ok(map_table(db_name, table_name, &columns)?)
}

/// Maps every table of `db_name`, in the order the source lists them.
///
/// A database without tables maps to an empty list. The first table that
/// fails to map fails the whole call.
pub fn describe_database<S: RowSource + ?Sized>(
    source: &mut S,
    db_name: &str,
) -> MapperResult<Vec<RecordSchema>> {
    let rows = source
        .fetch(TABLES_QUERY, &[SqlValue::from(db_name)])
        .map_err(MapperError::Source)?;
    let tables = rows
        .into_iter()
        .map(|row| {
            let [name]: [SqlValue; 1] = row.try_into().map_err(|row: Vec<SqlValue>| {
                MapperError::InvalidMetadata(format!("expected 1 column, got {}", row.len()))
            })?;
            text(name, "TABLE_NAME")?
                .ok_or_else(|| MapperError::InvalidMetadata("TABLE_NAME is null".into()))
        })
        .collect::<MapperResult<Vec<_>>>()?;

    let mut records = Vec::with_capacity(tables.len());
    for table in &tables {
        records.push(describe_table(&mut *source, db_name, table)?);
    }

    let table_count = records.len().to_string();
    log_event(
        Event::DatabaseMapped,
        &[("db", db_name), ("tables", &table_count)],
    );
    Ok(records)
}

fn descriptor_from_row(row: Vec<SqlValue>) -> MapperResult<ColumnDescriptor> {
    let [name, data_type, is_nullable, default, precision, scale, char_len]: [SqlValue; 7] =
        row.try_into().map_err(|row: Vec<SqlValue>| {
            MapperError::InvalidMetadata(format!("expected 7 columns, got {}", row.len()))
        })?;

    let name = text(name, "COLUMN_NAME")?
        .ok_or_else(|| MapperError::InvalidMetadata("COLUMN_NAME is null".into()))?;
    let data_type = text(data_type, "DATA_TYPE")?
        .ok_or_else(|| MapperError::InvalidMetadata("DATA_TYPE is null".into()))?;
    let nullable = text(is_nullable, "IS_NULLABLE")?
        .map(|s| s.eq_ignore_ascii_case("yes"))
        .unwrap_or(false);

    Ok(ColumnDescriptor {
        name,
        data_type,
        nullable,
        default: text(default, "COLUMN_DEFAULT")?,
        numeric_precision: number(precision, "NUMERIC_PRECISION")?
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX)),
        numeric_scale: number(scale, "NUMERIC_SCALE")?
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX)),
        char_octet_length: number(char_len, "CHARACTER_OCTET_LENGTH")?,
    })
}

fn text(value: SqlValue, column: &str) -> MapperResult<Option<String>> {
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Text(s) => Ok(Some(s)),
        SqlValue::Bytes(b) => String::from_utf8(b)
            .map(Some)
            .map_err(|_| MapperError::InvalidMetadata(format!("{} is not UTF-8", column))),
        SqlValue::Int(i) => Ok(Some(i.to_string())),
        SqlValue::Float(f) => Ok(Some(f.to_string())),
    }
}

fn number(value: SqlValue, column: &str) -> MapperResult<Option<u64>> {
    let invalid = || MapperError::InvalidMetadata(format!("{} is not a count", column));
    match value {
        SqlValue::Null => Ok(None),
        SqlValue::Int(i) => u64::try_from(i).map(Some).map_err(|_| invalid()),
        SqlValue::Text(s) => s.trim().parse().map(Some).map_err(|_| invalid()),
        SqlValue::Bytes(b) => String::from_utf8_lossy(&b)
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid()),
        SqlValue::Float(_) => Err(invalid()),
    }
}
