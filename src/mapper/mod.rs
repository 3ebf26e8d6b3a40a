//! Relational column mapper
//!
//! Maps column metadata (`INFORMATION_SCHEMA.COLUMNS` rows) to schema
//! fields, whole tables to record schemas, and a database to one record
//! per table.

mod column;
mod errors;
mod sqltypes;
mod table;

pub use column::{map_column, sanitize_name, ColumnDescriptor};
pub use errors::{MapperError, MapperResult};
pub use sqltypes::SqlType;
pub use table::{describe_database, describe_table, map_table, COLUMNS_QUERY, TABLES_QUERY};
