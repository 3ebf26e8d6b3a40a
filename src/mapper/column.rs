//! Column to field mapping
//!
//! - Base type from the relational data type
//! - Default re-encoded as JSON; unparsable temporal defaults are dropped
//! - Nullable columns become a two-branch union whose first branch types
//!   the default
//! - Column names sanitized to schema names; the real column name is kept
//!   as the single alias when sanitizing changed it

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sqltypes::SqlType;
use crate::codec::{temporal, SqlValue};
use crate::schema::{FieldSchema, Schema, SchemaError, SchemaResult};

/// One `INFORMATION_SCHEMA.COLUMNS` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub numeric_precision: Option<u32>,
    #[serde(default)]
    pub numeric_scale: Option<u32>,
    #[serde(default)]
    pub char_octet_length: Option<u64>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: false,
            default: None,
            numeric_precision: None,
            numeric_scale: None,
            char_octet_length: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_numeric(mut self, precision: u32, scale: u32) -> Self {
        self.numeric_precision = Some(precision);
        self.numeric_scale = Some(scale);
        self
    }

    pub fn with_char_length(mut self, len: u64) -> Self {
        self.char_octet_length = Some(len);
        self
    }

    /// This descriptor as an `INFORMATION_SCHEMA.COLUMNS` row, in the
    /// select-list order of `COLUMNS_QUERY`
    pub fn to_row(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::from(self.name.as_str()),
            SqlValue::from(self.data_type.as_str()),
            SqlValue::from(if self.nullable { "YES" } else { "NO" }),
            SqlValue::from(self.default.as_deref()),
            SqlValue::from(self.numeric_precision.map(i64::from)),
            SqlValue::from(self.numeric_scale.map(i64::from)),
            SqlValue::from(
                self.char_octet_length
                    .map(|n| i64::try_from(n).unwrap_or(i64::MAX)),
            ),
        ]
    }

    /// Maps this column to a record field
    pub fn to_field(&self) -> SchemaResult<FieldSchema> {
        map_column(
            &self.name,
            &self.data_type,
            self.nullable,
            self.default.as_deref(),
            self.numeric_precision.unwrap_or(0),
            self.numeric_scale.unwrap_or(0),
            self.char_octet_length.unwrap_or(0),
        )
    }
}

/// Maps one relational column to a record field.
///
/// # Errors
///
/// `UnsupportedType` for an unmapped data type.
pub fn map_column(
    name: &str,
    sql_type: &str,
    nullable: bool,
    raw_default: Option<&str>,
    precision: u32,
    scale: u32,
    char_len: u64,
) -> SchemaResult<FieldSchema> {
    let sql_type: SqlType = sql_type.parse()?;
    let field_name = sanitize_name(name)?;
    let base = sql_type.base_schema(&field_name, precision, scale, char_len)?;

    let mut default = raw_default.and_then(|raw| convert_default(sql_type, raw));
    let schema = if nullable {
        let has_non_null_default = matches!(default, Some(ref v) if !v.is_null());
        Schema::nullable(base, has_non_null_default)
    } else {
        if matches!(default, Some(Value::Null)) {
            default = None;
        }
        base
    };

    let mut field = FieldSchema::new(field_name.clone(), schema);
    if field_name != name {
        field.aliases = vec![name.to_string()];
    }
    field.default = default;
    Ok(field)
}

/// Re-encodes a relational default as a JSON scalar
fn convert_default(sql_type: SqlType, raw: &str) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    // String defaults are taken verbatim, including the text "NULL"
    if sql_type.is_string_family() {
        return Some(Value::String(raw.to_string()));
    }
    if raw.eq_ignore_ascii_case("null") {
        return Some(Value::Null);
    }
    let seconds = match sql_type {
        SqlType::Date => temporal::parse_date(raw).map(temporal::date_seconds),
        SqlType::Time => temporal::parse_time(raw).map(temporal::time_seconds),
        SqlType::DateTime | SqlType::Timestamp => {
            temporal::parse_datetime(raw).map(temporal::datetime_seconds)
        }
        _ => {
            return serde_json::from_str::<Value>(raw)
                .ok()
                .filter(|v| !v.is_array() && !v.is_object());
        }
    };
    seconds.ok().map(Value::from)
}

fn patterns() -> SchemaResult<&'static (Regex, Regex)> {
    static PATTERNS: OnceLock<Result<(Regex, Regex), regex::Error>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| Ok((Regex::new("[^A-Za-z0-9_]")?, Regex::new("^[0-9]+")?)))
        .as_ref()
        .map_err(|e| SchemaError::invalid(format!("name pattern: {}", e)))
}

/// Sanitizes a column name into a schema name: `[A-Za-z_][A-Za-z0-9_]*`.
///
/// A name with nothing usable becomes `_`.
pub fn sanitize_name(name: &str) -> SchemaResult<String> {
    let (disallowed, leading_digits) = patterns()?;
    let kept = disallowed.replace_all(name, "");
    let trimmed = leading_digits.replace(&kept, "");
    if trimmed.is_empty() {
        Ok("_".to_string())
    } else {
        Ok(trimmed.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DerivedPrimitive, Primitive};
    use serde_json::json;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("user_id").unwrap(), "user_id");
        assert_eq!(sanitize_name("user-id").unwrap(), "userid");
        assert_eq!(sanitize_name("2nd col").unwrap(), "ndcol");
        assert_eq!(sanitize_name("_9").unwrap(), "_9");
        assert_eq!(sanitize_name("%%").unwrap(), "_");
    }

    #[test]
    fn test_alias_only_when_renamed() {
        let plain = map_column("id", "bigint", false, None, 0, 0, 0).unwrap();
        assert!(plain.aliases.is_empty());

        let renamed = map_column("first name", "varchar", false, None, 0, 0, 0).unwrap();
        assert_eq!(renamed.name, "firstname");
        assert_eq!(renamed.aliases, vec!["first name".to_string()]);
        assert_eq!(renamed.sql_name(), "first name");
    }

    #[test]
    fn test_nullable_without_default_puts_null_first() {
        let field = map_column("n", "int", true, None, 0, 0, 0).unwrap();
        assert_eq!(field.schema, Schema::Union(vec![Schema::NULL, Primitive::Int.into()]));
        assert_eq!(field.default, None);
    }

    #[test]
    fn test_nullable_with_null_default_puts_null_first() {
        let field = map_column("n", "int", true, Some("NULL"), 0, 0, 0).unwrap();
        assert_eq!(field.schema, Schema::Union(vec![Schema::NULL, Primitive::Int.into()]));
        assert_eq!(field.default, Some(Value::Null));
    }

    #[test]
    fn test_nullable_with_default_puts_base_first() {
        let field = map_column("n", "int", true, Some("7"), 0, 0, 0).unwrap();
        assert_eq!(field.schema, Schema::Union(vec![Primitive::Int.into(), Schema::NULL]));
        assert_eq!(field.default, Some(json!(7)));
    }

    #[test]
    fn test_string_default_quoted() {
        let field = map_column("s", "varchar", false, Some("it's \"x\""), 0, 0, 0).unwrap();
        assert_eq!(field.default, Some(json!("it's \"x\"")));
    }

    #[test]
    fn test_string_null_text_default_stays_text() {
        let field = map_column("s", "varchar", true, Some("NULL"), 0, 0, 0).unwrap();
        assert_eq!(field.default, Some(json!("NULL")));
        assert_eq!(field.schema, Schema::Union(vec![Primitive::String.into(), Schema::NULL]));

        let text = map_column("t", "text", false, Some("null"), 0, 0, 0).unwrap();
        assert_eq!(text.default, Some(json!("null")));
    }

    #[test]
    fn test_temporal_defaults_as_epoch_seconds() {
        let date = map_column("d", "date", false, Some("1970-01-02"), 0, 0, 0).unwrap();
        assert_eq!(date.default, Some(json!(86_400)));
        assert_eq!(date.schema, DerivedPrimitive::date().into());

        let time = map_column("t", "time", false, Some("00:01:40"), 0, 0, 0).unwrap();
        assert_eq!(time.default, Some(json!(100)));

        let dt = map_column("dt", "datetime", false, Some("1970-01-01 01:00:00"), 0, 0, 0).unwrap();
        assert_eq!(dt.default, Some(json!(3_600)));
    }

    #[test]
    fn test_unparsable_defaults_dropped() {
        let ts = map_column("ts", "timestamp", true, Some("CURRENT_TIMESTAMP"), 0, 0, 0).unwrap();
        assert_eq!(ts.default, None);
        assert!(matches!(ts.schema, Schema::Union(ref b) if b[0].is_null()));

        let bit = map_column("b", "bit", false, Some("b'1'"), 0, 0, 0).unwrap();
        assert_eq!(bit.default, None);
    }

    #[test]
    fn test_unsupported_type() {
        let err = map_column("g", "geometry", false, None, 0, 0, 0).unwrap_err();
        assert!(err.is_unsupported_type());
    }

    #[test]
    fn test_descriptor_from_json() {
        let column: ColumnDescriptor = serde_json::from_value(json!({
            "name": "price",
            "data_type": "DECIMAL",
            "nullable": true,
            "numeric_precision": 8,
            "numeric_scale": 2
        }))
        .unwrap();
        let field = column.to_field().unwrap();
        assert_eq!(
            field.schema,
            Schema::Union(vec![Schema::NULL, DerivedPrimitive::decimal(8, Some(2)).into()])
        );
    }
}
