//! Text encoding
//!
//! One display string per cell, for tabular export. Temporal values are
//! shown in the layout of their source column; a null cell is empty.

use super::errors::CodecResult;
use super::slot::{Nullable, Scalar, ScanSlot};
use super::temporal;
use super::value::{SqlValue, TypedValue};
use crate::schema::{Schema, TimestampRepr};

/// Encodes one fetched value typed by `schema` as display text
pub fn encode_text(schema: &Schema, value: SqlValue) -> CodecResult<String> {
    let slot = ScanSlot::for_schema(schema)?;
    let read = slot.read(value)?;
    text_from_slot(&slot, read)
}

/// Encodes a value already read into `slot`
pub fn text_from_slot(slot: &ScanSlot<'_>, read: Nullable<Scalar>) -> CodecResult<String> {
    match read.into_option() {
        None => Ok(String::new()),
        Some(scalar) => Ok(to_text(TypedValue::read(slot.target(), scalar)?)),
    }
}

fn to_text(value: TypedValue) -> String {
    match value {
        TypedValue::Int(v) => v.to_string(),
        TypedValue::Long(v) => v.to_string(),
        TypedValue::Float(v) => v.to_string(),
        TypedValue::Double(v) => v.to_string(),
        TypedValue::String(v) => v,
        TypedValue::Bytes(v) | TypedValue::Fixed(v) => String::from_utf8_lossy(&v).into_owned(),
        TypedValue::Date { date, .. } => temporal::format_date(date),
        TypedValue::Time { time, .. } => temporal::format_time(time),
        TypedValue::Timestamp {
            at,
            repr: TimestampRepr::WallClock,
            ..
        } => temporal::format_datetime(at),
        TypedValue::Timestamp {
            at,
            repr: TimestampRepr::Epoch,
            ..
        } => temporal::datetime_seconds(at).to_string(),
        TypedValue::Decimal(d) => d.to_string(),
    }
}
