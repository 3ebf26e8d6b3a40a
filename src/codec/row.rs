//! Row-level encoding
//!
//! A `RowCodec` picks one scan slot per record field up front, then encodes
//! each fetched row in schema order. A failing cell fails the whole row.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::errors::{CodecError, CodecResult};
use super::limit::limit_from_slot;
use super::native::native_from_slot;
use super::slot::ScanSlot;
use super::text::text_from_slot;
use super::value::{NativeValue, SqlValue};
use crate::schema::{FieldSchema, RecordSchema};

/// Encoded cells keyed by field name, in schema order
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRow<T> {
    fields: Vec<(String, T)>,
}

impl<T> EncodedRow<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Cells without their names
    pub fn into_values(self) -> Vec<T> {
        self.fields.into_iter().map(|(_, v)| v).collect()
    }
}

impl<T: Serialize> Serialize for EncodedRow<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Native record
pub type NativeRecord = EncodedRow<NativeValue>;

/// Text row
pub type TextRow = EncodedRow<String>;

/// Per-record encoding plan
#[derive(Debug, Clone)]
pub struct RowCodec<'a> {
    columns: Vec<(&'a FieldSchema, ScanSlot<'a>)>,
}

impl<'a> RowCodec<'a> {
    /// Chooses a slot for every field.
    ///
    /// # Errors
    ///
    /// `UnsupportedTypeForSql` if any field cannot be read from a column.
    pub fn new(record: &'a RecordSchema) -> CodecResult<Self> {
        let columns = record
            .fields()
            .iter()
            .map(|field| Ok((field, ScanSlot::for_schema(&field.schema)?)))
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(Self { columns })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn encode_native_row(&self, row: Vec<SqlValue>) -> CodecResult<NativeRecord> {
        self.encode_row(row, |slot, value| native_from_slot(slot, slot.read(value)?))
    }

    pub fn encode_text_row(&self, row: Vec<SqlValue>) -> CodecResult<TextRow> {
        self.encode_row(row, |slot, value| text_from_slot(slot, slot.read(value)?))
    }

    /// Limit-encodes the cell of field `index`
    pub fn encode_limit_cell(&self, index: usize, value: SqlValue) -> CodecResult<serde_json::Value> {
        let (field, slot) = self.columns.get(index).ok_or_else(|| {
            CodecError::invalid_value(format!("no column at position {}", index))
        })?;
        slot.read(value)
            .and_then(|read| limit_from_slot(slot, read))
            .map_err(|e| with_field(e, &field.name))
    }

    fn encode_row<T, F>(&self, row: Vec<SqlValue>, encode: F) -> CodecResult<EncodedRow<T>>
    where
        F: Fn(&ScanSlot<'a>, SqlValue) -> CodecResult<T>,
    {
        if row.len() != self.columns.len() {
            return Err(CodecError::invalid_value(format!(
                "row has {} cells, record has {} fields",
                row.len(),
                self.columns.len()
            )));
        }
        let fields = self
            .columns
            .iter()
            .zip(row)
            .map(|((field, slot), value)| {
                encode(slot, value)
                    .map(|cell| (field.name.clone(), cell))
                    .map_err(|e| with_field(e, &field.name))
            })
            .collect::<CodecResult<Vec<_>>>()?;
        Ok(EncodedRow { fields })
    }
}

fn with_field(err: CodecError, name: &str) -> CodecError {
    match err {
        CodecError::InvalidValue(reason) => {
            CodecError::InvalidValue(format!("field '{}': {}", name, reason))
        }
        other => other,
    }
}

/// Encodes one row of `record` natively
pub fn encode_native_row(record: &RecordSchema, row: Vec<SqlValue>) -> CodecResult<NativeRecord> {
    RowCodec::new(record)?.encode_native_row(row)
}

/// Encodes one row of `record` as text cells
pub fn encode_text_row(record: &RecordSchema, row: Vec<SqlValue>) -> CodecResult<TextRow> {
    RowCodec::new(record)?.encode_text_row(row)
}
