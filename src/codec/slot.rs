//! Scan slots
//!
//! A `ScanSlot` is the typed placeholder a column is read into, chosen from
//! the column's schema. Nullable columns use a `Nullable<T>` placeholder
//! (validity flag + value). Only the nullable-scalar subset of unions is
//! readable: exactly two branches, one of them null, the other not a union.

use super::errors::{CodecError, CodecResult};
use super::value::SqlValue;
use crate::schema::{LogicalKind, Primitive, Schema, TimestampRepr};

/// Physical shape a column is read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Bytes,
}

/// A scalar read into a slot
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Scalar {
    /// Zero value of a slot kind
    pub fn zero(kind: SlotKind) -> Self {
        match kind {
            SlotKind::Int32 => Scalar::Int32(0),
            SlotKind::Int64 => Scalar::Int64(0),
            SlotKind::Float32 => Scalar::Float32(0.0),
            SlotKind::Float64 => Scalar::Float64(0.0),
            SlotKind::Text => Scalar::Text(String::new()),
            SlotKind::Bytes => Scalar::Bytes(Vec::new()),
        }
    }
}

/// Placeholder for a nullable column
#[derive(Debug, Clone, PartialEq)]
pub struct Nullable<T> {
    pub valid: bool,
    pub value: T,
}

impl<T> Nullable<T> {
    pub fn valid(value: T) -> Self {
        Self { valid: true, value }
    }

    pub fn into_option(self) -> Option<T> {
        if self.valid {
            Some(self.value)
        } else {
            None
        }
    }
}

/// Typed placeholder for one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSlot<'a> {
    kind: SlotKind,
    target: &'a Schema,
    branch: Option<usize>,
}

impl<'a> ScanSlot<'a> {
    /// Chooses the slot for a column schema.
    ///
    /// # Errors
    ///
    /// `UnsupportedTypeForSql` for unions outside the nullable-scalar subset
    /// and for null, boolean, array, map, record, enum and reference columns.
    pub fn for_schema(schema: &'a Schema) -> CodecResult<Self> {
        match schema {
            Schema::Union(branches) => {
                if let Some(nested) = branches.iter().find(|b| matches!(b, Schema::Union(_))) {
                    return Err(CodecError::UnsupportedTypeForSql(format!(
                        "union containing a union ({})",
                        nested
                    )));
                }
                let (branch, target) = schema.nullable_inner().ok_or_else(|| {
                    CodecError::UnsupportedTypeForSql(format!(
                        "only [null, T] unions are readable, got {}",
                        schema
                    ))
                })?;
                Ok(Self {
                    kind: slot_kind(target)?,
                    target,
                    branch: Some(branch),
                })
            }
            other => Ok(Self {
                kind: slot_kind(other)?,
                target: other,
                branch: None,
            }),
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Non-null schema the value is typed by
    pub fn target(&self) -> &'a Schema {
        self.target
    }

    /// Index of the non-null union branch, for nullable slots
    pub fn branch(&self) -> Option<usize> {
        self.branch
    }

    pub fn is_nullable(&self) -> bool {
        self.branch.is_some()
    }

    /// Reads a driver value into this slot.
    ///
    /// A null is only accepted by nullable slots and reads as invalid.
    pub fn read(&self, value: SqlValue) -> CodecResult<Nullable<Scalar>> {
        if value.is_null() {
            if self.is_nullable() {
                return Ok(Nullable {
                    valid: false,
                    value: Scalar::zero(self.kind),
                });
            }
            return Err(CodecError::invalid_value(format!(
                "null in non-nullable '{}' column",
                self.target.type_tag()
            )));
        }
        read_scalar(self.kind, value).map(Nullable::valid)
    }
}

fn slot_kind(schema: &Schema) -> CodecResult<SlotKind> {
    match schema {
        Schema::Primitive(p) => match p {
            Primitive::Int => Ok(SlotKind::Int32),
            Primitive::Long => Ok(SlotKind::Int64),
            Primitive::Float => Ok(SlotKind::Float32),
            Primitive::Double => Ok(SlotKind::Float64),
            Primitive::String => Ok(SlotKind::Text),
            Primitive::Bytes => Ok(SlotKind::Bytes),
            Primitive::Null | Primitive::Boolean => {
                Err(CodecError::unsupported_for_sql(p.type_tag()))
            }
        },
        Schema::Derived(d) => match d.logical() {
            LogicalKind::Date | LogicalKind::Time => Ok(SlotKind::Text),
            LogicalKind::Timestamp(TimestampRepr::WallClock) => Ok(SlotKind::Text),
            LogicalKind::Timestamp(TimestampRepr::Epoch) => match d.base() {
                Primitive::Long => Ok(SlotKind::Int64),
                _ => Ok(SlotKind::Int32),
            },
            LogicalKind::Decimal { .. } => Ok(SlotKind::Bytes),
        },
        Schema::Fixed(_) => Ok(SlotKind::Bytes),
        other => Err(CodecError::unsupported_for_sql(other.type_tag())),
    }
}

fn read_scalar(kind: SlotKind, value: SqlValue) -> CodecResult<Scalar> {
    match kind {
        SlotKind::Int32 => {
            let wide = read_i64(value)?;
            i32::try_from(wide)
                .map(Scalar::Int32)
                .map_err(|_| CodecError::invalid_value(format!("{} does not fit in int", wide)))
        }
        SlotKind::Int64 => read_i64(value).map(Scalar::Int64),
        SlotKind::Float32 => read_f64(value).map(|f| Scalar::Float32(f as f32)),
        SlotKind::Float64 => read_f64(value).map(Scalar::Float64),
        SlotKind::Text => match value {
            SqlValue::Text(s) => Ok(Scalar::Text(s)),
            SqlValue::Bytes(b) => String::from_utf8(b)
                .map(Scalar::Text)
                .map_err(|_| CodecError::invalid_value("text column is not valid UTF-8")),
            SqlValue::Int(i) => Ok(Scalar::Text(i.to_string())),
            SqlValue::Float(f) => Ok(Scalar::Text(f.to_string())),
            SqlValue::Null => Err(CodecError::invalid_value("unexpected null")),
        },
        SlotKind::Bytes => match value {
            SqlValue::Bytes(b) => Ok(Scalar::Bytes(b)),
            SqlValue::Text(s) => Ok(Scalar::Bytes(s.into_bytes())),
            SqlValue::Int(i) => Ok(Scalar::Bytes(i.to_string().into_bytes())),
            SqlValue::Float(f) => Ok(Scalar::Bytes(f.to_string().into_bytes())),
            SqlValue::Null => Err(CodecError::invalid_value("unexpected null")),
        },
    }
}

fn read_i64(value: SqlValue) -> CodecResult<i64> {
    match value {
        SqlValue::Int(i) => Ok(i),
        SqlValue::Text(s) => parse_text(&s),
        SqlValue::Bytes(b) => parse_text(&String::from_utf8_lossy(&b)),
        SqlValue::Float(f) => Err(CodecError::invalid_value(format!(
            "float {} in integer column",
            f
        ))),
        SqlValue::Null => Err(CodecError::invalid_value("unexpected null")),
    }
}

fn read_f64(value: SqlValue) -> CodecResult<f64> {
    match value {
        SqlValue::Float(f) => Ok(f),
        SqlValue::Int(i) => Ok(i as f64),
        SqlValue::Text(s) => parse_text(&s),
        SqlValue::Bytes(b) => parse_text(&String::from_utf8_lossy(&b)),
        SqlValue::Null => Err(CodecError::invalid_value("unexpected null")),
    }
}

fn parse_text<T: std::str::FromStr>(text: &str) -> CodecResult<T> {
    text.trim()
        .parse()
        .map_err(|_| CodecError::invalid_value(format!("cannot read number from '{}'", text)))
}
