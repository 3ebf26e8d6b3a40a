//! Relational type vocabulary
//!
//! Data types as reported by `INFORMATION_SCHEMA.COLUMNS.DATA_TYPE`,
//! matched case-insensitively.

use std::fmt;
use std::str::FromStr;

use crate::schema::{
    DerivedPrimitive, FixedSchema, Primitive, Schema, SchemaError, SchemaResult, TimestampRepr,
};

/// Relational column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlType {
    // Text
    Char,
    NChar,
    VarChar,
    NVarChar,
    Text,
    TinyText,
    MediumText,
    LongText,
    Enum,
    Set,

    // Binary
    Blob,
    TinyBlob,
    MediumBlob,
    LongBlob,
    Bit,

    // Numbers
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    Year,
    BigInt,
    Float,
    Double,
    Decimal,

    // Dates
    Date,
    Time,
    DateTime,
    Timestamp,
}

impl SqlType {
    /// Returns the lowercase type name
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Char => "char",
            SqlType::NChar => "nchar",
            SqlType::VarChar => "varchar",
            SqlType::NVarChar => "nvarchar",
            SqlType::Text => "text",
            SqlType::TinyText => "tinytext",
            SqlType::MediumText => "mediumtext",
            SqlType::LongText => "longtext",
            SqlType::Enum => "enum",
            SqlType::Set => "set",
            SqlType::Blob => "blob",
            SqlType::TinyBlob => "tinyblob",
            SqlType::MediumBlob => "mediumblob",
            SqlType::LongBlob => "longblob",
            SqlType::Bit => "bit",
            SqlType::TinyInt => "tinyint",
            SqlType::SmallInt => "smallint",
            SqlType::MediumInt => "mediumint",
            SqlType::Int => "int",
            SqlType::Year => "year",
            SqlType::BigInt => "bigint",
            SqlType::Float => "float",
            SqlType::Double => "double",
            SqlType::Decimal => "decimal",
            SqlType::Date => "date",
            SqlType::Time => "time",
            SqlType::DateTime => "datetime",
            SqlType::Timestamp => "timestamp",
        }
    }

    /// Types whose defaults are quoted as JSON strings
    pub fn is_string_family(&self) -> bool {
        matches!(
            self,
            SqlType::Char
                | SqlType::NChar
                | SqlType::VarChar
                | SqlType::NVarChar
                | SqlType::Text
                | SqlType::TinyText
                | SqlType::MediumText
                | SqlType::LongText
                | SqlType::Enum
                | SqlType::Set
        )
    }

    /// Maps to the non-nullable base schema.
    ///
    /// `name` names the fixed type generated for CHAR columns.
    pub fn base_schema(
        &self,
        name: &str,
        precision: u32,
        scale: u32,
        char_len: u64,
    ) -> SchemaResult<Schema> {
        let schema = match self {
            SqlType::Char | SqlType::NChar => Schema::Fixed(FixedSchema::new(name, char_len)?),
            SqlType::VarChar
            | SqlType::NVarChar
            | SqlType::Text
            | SqlType::TinyText
            | SqlType::MediumText
            | SqlType::LongText
            | SqlType::Enum
            | SqlType::Set => Primitive::String.into(),
            SqlType::Blob
            | SqlType::TinyBlob
            | SqlType::MediumBlob
            | SqlType::LongBlob
            | SqlType::Bit => Primitive::Bytes.into(),
            SqlType::TinyInt
            | SqlType::SmallInt
            | SqlType::MediumInt
            | SqlType::Int
            | SqlType::Year => Primitive::Int.into(),
            SqlType::BigInt => Primitive::Long.into(),
            SqlType::Float => Primitive::Float.into(),
            SqlType::Double => Primitive::Double.into(),
            SqlType::Decimal => DerivedPrimitive::decimal(precision, Some(scale)).into(),
            SqlType::Date => DerivedPrimitive::date().into(),
            SqlType::Time => DerivedPrimitive::time().into(),
            SqlType::DateTime => DerivedPrimitive::timestamp(TimestampRepr::WallClock).into(),
            SqlType::Timestamp => DerivedPrimitive::timestamp(TimestampRepr::Epoch).into(),
        };
        Ok(schema)
    }
}

impl FromStr for SqlType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sql_type = match s.trim().to_ascii_lowercase().as_str() {
            "char" => SqlType::Char,
            "nchar" => SqlType::NChar,
            "varchar" => SqlType::VarChar,
            "nvarchar" => SqlType::NVarChar,
            "text" => SqlType::Text,
            "tinytext" => SqlType::TinyText,
            "mediumtext" => SqlType::MediumText,
            "longtext" => SqlType::LongText,
            "enum" => SqlType::Enum,
            "set" => SqlType::Set,
            "blob" => SqlType::Blob,
            "tinyblob" => SqlType::TinyBlob,
            "mediumblob" => SqlType::MediumBlob,
            "longblob" => SqlType::LongBlob,
            "bit" => SqlType::Bit,
            "tinyint" => SqlType::TinyInt,
            "smallint" => SqlType::SmallInt,
            "mediumint" => SqlType::MediumInt,
            "int" => SqlType::Int,
            "year" => SqlType::Year,
            "bigint" => SqlType::BigInt,
            "float" => SqlType::Float,
            "double" => SqlType::Double,
            "decimal" => SqlType::Decimal,
            "date" => SqlType::Date,
            "time" => SqlType::Time,
            "datetime" => SqlType::DateTime,
            "timestamp" => SqlType::Timestamp,
            _ => return Err(SchemaError::unsupported(s)),
        };
        Ok(sql_type)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
