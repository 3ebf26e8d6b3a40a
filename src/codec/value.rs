//! Value types
//!
//! - `SqlValue`: what the relational driver hands over (and binds)
//! - `TypedValue`: a scalar interpreted through its schema
//! - `NativeValue`: schema-native output ready for container serialization
//!
//! `TypedValue::read` is the single type dispatch shared by the native, text
//! and limit encodings.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::decimal::Decimal;
use super::errors::{CodecError, CodecResult};
use super::slot::Scalar;
use super::temporal;
use crate::schema::{LogicalKind, Primitive, Schema, TimestampRepr, TypeTag};

/// Driver boundary value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Bytes(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// A non-null scalar interpreted through its schema
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Fixed(Vec<u8>),
    /// Date on an int or long base
    Date { date: NaiveDate, base: Primitive },
    /// Time of day on an int or long base
    Time { time: NaiveTime, base: Primitive },
    Timestamp {
        at: NaiveDateTime,
        repr: TimestampRepr,
        base: Primitive,
    },
    Decimal(Decimal),
}

impl TypedValue {
    /// Interprets a scalar read from a slot targeting `schema`.
    ///
    /// `schema` is the slot's non-null target.
    pub fn read(schema: &Schema, scalar: Scalar) -> CodecResult<Self> {
        match (schema, scalar) {
            (Schema::Primitive(Primitive::Int), Scalar::Int32(v)) => Ok(TypedValue::Int(v)),
            (Schema::Primitive(Primitive::Long), Scalar::Int64(v)) => Ok(TypedValue::Long(v)),
            (Schema::Primitive(Primitive::Float), Scalar::Float32(v)) => Ok(TypedValue::Float(v)),
            (Schema::Primitive(Primitive::Double), Scalar::Float64(v)) => {
                Ok(TypedValue::Double(v))
            }
            (Schema::Primitive(Primitive::String), Scalar::Text(v)) => Ok(TypedValue::String(v)),
            (Schema::Primitive(Primitive::Bytes), Scalar::Bytes(v)) => Ok(TypedValue::Bytes(v)),
            (Schema::Fixed(fixed), Scalar::Bytes(mut v)) => {
                let size = usize::try_from(fixed.size())
                    .map_err(|_| CodecError::invalid_value("fixed size out of range"))?;
                // CHAR columns come back with trailing spaces stripped
                if v.len() < size && !fixed.is_duration() {
                    v.resize(size, b' ');
                }
                if v.len() != size {
                    return Err(CodecError::invalid_value(format!(
                        "{} bytes for fixed '{}' of size {}",
                        v.len(),
                        fixed.name,
                        size
                    )));
                }
                Ok(TypedValue::Fixed(v))
            }
            (Schema::Derived(d), scalar) => read_derived(d.logical(), d.base(), scalar),
            (schema, _) => Err(CodecError::unsupported_for_sql(schema.type_tag())),
        }
    }

    /// Seconds since epoch for temporal values
    pub fn epoch_seconds(&self) -> Option<i64> {
        match self {
            TypedValue::Date { date, .. } => Some(temporal::date_seconds(*date)),
            TypedValue::Time { time, .. } => Some(temporal::time_seconds(*time)),
            TypedValue::Timestamp { at, .. } => Some(temporal::datetime_seconds(*at)),
            _ => None,
        }
    }
}

fn read_derived(logical: LogicalKind, base: Primitive, scalar: Scalar) -> CodecResult<TypedValue> {
    match (logical, scalar) {
        (LogicalKind::Date, Scalar::Text(text)) => Ok(TypedValue::Date {
            date: temporal::parse_date(&text)?,
            base,
        }),
        (LogicalKind::Time, Scalar::Text(text)) => Ok(TypedValue::Time {
            time: temporal::parse_time(&text)?,
            base,
        }),
        (LogicalKind::Timestamp(TimestampRepr::WallClock), Scalar::Text(text)) => {
            Ok(TypedValue::Timestamp {
                at: temporal::parse_datetime(&text)?,
                repr: TimestampRepr::WallClock,
                base,
            })
        }
        (LogicalKind::Timestamp(TimestampRepr::Epoch), Scalar::Int32(secs)) => {
            Ok(TypedValue::Timestamp {
                at: temporal::from_epoch_seconds(i64::from(secs))?,
                repr: TimestampRepr::Epoch,
                base,
            })
        }
        (LogicalKind::Timestamp(TimestampRepr::Epoch), Scalar::Int64(secs)) => {
            Ok(TypedValue::Timestamp {
                at: temporal::from_epoch_seconds(secs)?,
                repr: TimestampRepr::Epoch,
                base,
            })
        }
        (LogicalKind::Decimal { precision, scale }, Scalar::Bytes(bytes)) => {
            let text = String::from_utf8(bytes)
                .map_err(|_| CodecError::invalid_value("decimal column is not valid text"))?;
            // Missing scale means zero
            let value = Decimal::parse(&text)?.fit(precision, scale.unwrap_or(0))?;
            Ok(TypedValue::Decimal(value))
        }
        (logical, _) => Err(CodecError::unsupported_for_sql(logical.type_tag())),
    }
}

/// Schema-native value
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    /// Absence: the null branch of a nullable union
    Null,
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Fixed(Vec<u8>),
    Decimal(Decimal),
    /// Non-null union branch
    Union {
        /// Branch position in the union schema
        index: usize,
        /// Branch type tag
        tag: TypeTag,
        value: Box<NativeValue>,
    },
}

impl Serialize for NativeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NativeValue::Null => serializer.serialize_unit(),
            NativeValue::Int(v) => serializer.serialize_i32(*v),
            NativeValue::Long(v) => serializer.serialize_i64(*v),
            NativeValue::Float(v) => serializer.serialize_f32(*v),
            NativeValue::Double(v) => serializer.serialize_f64(*v),
            NativeValue::String(v) => serializer.serialize_str(v),
            // Avro JSON encoding maps each byte to one code point
            NativeValue::Bytes(v) | NativeValue::Fixed(v) => {
                let text: String = v.iter().map(|b| char::from(*b)).collect();
                serializer.serialize_str(&text)
            }
            NativeValue::Decimal(d) => serializer.serialize_str(&d.to_string()),
            NativeValue::Union { tag, value, .. } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(tag.as_str(), value.as_ref())?;
                map.end()
            }
        }
    }
}
