//! Schema JSON writer
//!
//! Emits compact JSON with keys in a fixed canonical order and omits empty
//! optional keys. `serialize(parse(x)) == x` for canonical input.
//!
//! Key order per variant:
//! - record: type, namespace, name, aliases, doc, fields
//! - field: name, aliases, doc, type, default, order
//! - enum: type, namespace, name, aliases, doc, symbols
//! - fixed: type, logicalType, namespace, name, aliases, doc, size
//! - derived: type, doc, logicalType, precision, scale, representation
//! - array: type, items; map: type, values
//!
//! Primitives are always written as bare names, so the object form
//! `{"type":"int"}` is not canonical and comes back as `"int"`.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::Serialize;

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    DerivedPrimitive, EnumSchema, FieldSchema, FixedSchema, LogicalKind, RecordSchema, Schema,
    TimestampRepr,
};

/// Serializes a schema to canonical JSON bytes
pub fn serialize(schema: &Schema) -> SchemaResult<Vec<u8>> {
    serde_json::to_vec(schema)
        .map_err(|e| SchemaError::invalid(format!("cannot serialize schema: {}", e)))
}

/// Serializes a schema to canonical JSON text
pub fn to_json_string(schema: &Schema) -> SchemaResult<String> {
    serde_json::to_string(schema)
        .map_err(|e| SchemaError::invalid(format!("cannot serialize schema: {}", e)))
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Schema::Primitive(p) => serializer.serialize_str(p.name()),
            Schema::Reference(name) => serializer.serialize_str(name),
            Schema::Derived(d) => d.serialize(serializer),
            Schema::Array(items) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "array")?;
                map.serialize_entry("items", items.as_ref())?;
                map.end()
            }
            Schema::Map(values) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "map")?;
                map.serialize_entry("values", values.as_ref())?;
                map.end()
            }
            Schema::Union(branches) => {
                let mut seq = serializer.serialize_seq(Some(branches.len()))?;
                for branch in branches {
                    seq.serialize_element(branch)?;
                }
                seq.end()
            }
            Schema::Record(r) => r.serialize(serializer),
            Schema::Enum(e) => e.serialize(serializer),
            Schema::Fixed(f) => f.serialize(serializer),
        }
    }
}

/// Writes namespace, name, aliases, doc for a named type
fn serialize_named<M: SerializeMap>(
    map: &mut M,
    namespace: &Option<String>,
    name: &str,
    aliases: &[String],
    doc: &Option<String>,
) -> Result<(), M::Error> {
    if let Some(ns) = namespace {
        map.serialize_entry("namespace", ns)?;
    }
    map.serialize_entry("name", name)?;
    if !aliases.is_empty() {
        map.serialize_entry("aliases", aliases)?;
    }
    if let Some(doc) = doc {
        map.serialize_entry("doc", doc)?;
    }
    Ok(())
}

impl Serialize for RecordSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "record")?;
        serialize_named(&mut map, &self.namespace, &self.name, &self.aliases, &self.doc)?;
        map.serialize_entry("fields", &self.fields)?;
        map.end()
    }
}

impl Serialize for FieldSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if !self.aliases.is_empty() {
            map.serialize_entry("aliases", &self.aliases)?;
        }
        if let Some(doc) = &self.doc {
            map.serialize_entry("doc", doc)?;
        }
        map.serialize_entry("type", &self.schema)?;
        if let Some(default) = &self.default {
            map.serialize_entry("default", default)?;
        }
        if let Some(order) = &self.order {
            map.serialize_entry("order", order.name())?;
        }
        map.end()
    }
}

impl Serialize for EnumSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "enum")?;
        serialize_named(&mut map, &self.namespace, &self.name, &self.aliases, &self.doc)?;
        map.serialize_entry("symbols", &self.symbols)?;
        map.end()
    }
}

impl Serialize for FixedSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", "fixed")?;
        if self.is_duration() {
            map.serialize_entry("logicalType", "duration")?;
        }
        serialize_named(&mut map, &self.namespace, &self.name, &self.aliases, &self.doc)?;
        map.serialize_entry("size", &self.size())?;
        map.end()
    }
}

impl Serialize for DerivedPrimitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.base().name())?;
        if let Some(doc) = self.doc() {
            map.serialize_entry("doc", doc)?;
        }
        let logical = self.logical();
        map.serialize_entry("logicalType", logical.name())?;
        match logical {
            LogicalKind::Decimal { precision, scale } => {
                map.serialize_entry("precision", &precision)?;
                if let Some(scale) = scale {
                    map.serialize_entry("scale", &scale)?;
                }
            }
            LogicalKind::Timestamp(TimestampRepr::WallClock) => {
                map.serialize_entry("representation", TimestampRepr::WallClock.name())?;
            }
            LogicalKind::Timestamp(TimestampRepr::Epoch) | LogicalKind::Date | LogicalKind::Time => {}
        }
        map.end()
    }
}
