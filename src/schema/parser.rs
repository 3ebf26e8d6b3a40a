//! Schema JSON parser
//!
//! Node kind is decided structurally:
//! - JSON array: union
//! - JSON string: primitive name, or a bare reference to a known name
//! - JSON object: dispatched on its `type` key
//!
//! Named-type references resolve against the names in scope: the caller's
//! ancestors, every enclosing record (pushed before its fields are parsed),
//! and every named type defined earlier in the same document. No symbol
//! table pre-pass is needed.
//!
//! A `SchemaParser` holds transient state for exactly one parse. It is not
//! shared and keeps nothing between calls.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{
    DerivedPrimitive, EnumSchema, FieldSchema, FixedSchema, LogicalKind, Order, Primitive,
    RecordSchema, Schema, TimestampRepr,
};
use crate::observability::{log_event, Event, Logger};

/// Parses schema JSON bytes.
///
/// # Arguments
///
/// * `bytes` - Schema JSON
/// * `ancestors` - Names that may appear as bare references
///
/// # Errors
///
/// - `InvalidSchema` for malformed JSON or structure
/// - `UnsupportedType` for an unrecognized type tag
pub fn parse(bytes: &[u8], ancestors: &[String]) -> SchemaResult<Schema> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| SchemaError::invalid(format!("malformed JSON: {}", e)))?;
    let schema = parse_value(&value, ancestors)?;

    if Logger::enabled(Event::SchemaParsed.severity()) {
        let tag = schema.type_tag();
        log_event(
            Event::SchemaParsed,
            &[
                ("type", tag.as_str()),
                ("name", schema.name().unwrap_or("")),
            ],
        );
    }

    Ok(schema)
}

/// Parses schema JSON text
pub fn parse_str(text: &str, ancestors: &[String]) -> SchemaResult<Schema> {
    parse(text.as_bytes(), ancestors)
}

/// Parses an already decoded JSON value
pub fn parse_value(value: &Value, ancestors: &[String]) -> SchemaResult<Schema> {
    let mut parser = SchemaParser::new(ancestors);
    parser.parse_any(value)
}

/// Single-use recursive parser
struct SchemaParser {
    names: Vec<String>,
}

impl SchemaParser {
    fn new(ancestors: &[String]) -> Self {
        Self {
            names: ancestors.to_vec(),
        }
    }

    fn knows(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn define(&mut self, name: &str, namespace: Option<&str>) {
        self.names.push(name.to_string());
        if let Some(ns) = namespace {
            self.names.push(format!("{}.{}", ns, name));
        }
    }

    fn parse_any(&mut self, value: &Value) -> SchemaResult<Schema> {
        match value {
            Value::String(name) => self.parse_name(name),
            Value::Array(branches) => self.parse_union(branches),
            Value::Object(object) => self.parse_object(object),
            other => Err(SchemaError::invalid(format!(
                "schema must be a string, array or object, got {}",
                json_kind(other)
            ))),
        }
    }

    fn parse_name(&self, name: &str) -> SchemaResult<Schema> {
        if let Some(primitive) = Primitive::from_name(name) {
            return Ok(Schema::Primitive(primitive));
        }
        if self.knows(name) {
            return Ok(Schema::Reference(name.to_string()));
        }
        Err(SchemaError::unsupported(name))
    }

    fn parse_union(&mut self, branches: &[Value]) -> SchemaResult<Schema> {
        if branches.is_empty() {
            return Err(SchemaError::invalid("union must have at least one branch"));
        }
        let parsed = branches
            .iter()
            .map(|branch| self.parse_any(branch))
            .collect::<SchemaResult<Vec<_>>>()?;
        Ok(Schema::Union(parsed))
    }

    fn parse_object(&mut self, object: &Map<String, Value>) -> SchemaResult<Schema> {
        let type_name = match object.get("type") {
            Some(Value::String(s)) => s.as_str(),
            Some(_) => return Err(SchemaError::wrong_kind("type", "a string")),
            None => return Err(SchemaError::missing_key("type", "schema object")),
        };

        match type_name {
            "array" => {
                let items = object
                    .get("items")
                    .ok_or_else(|| SchemaError::missing_key("items", "array"))?;
                Ok(Schema::Array(Box::new(self.parse_any(items)?)))
            }
            "map" => {
                let values = object
                    .get("values")
                    .ok_or_else(|| SchemaError::missing_key("values", "map"))?;
                Ok(Schema::Map(Box::new(self.parse_any(values)?)))
            }
            "record" => self.parse_record(object),
            "enum" => self.parse_enum(object),
            "fixed" => self.parse_fixed(object),
            other => match Primitive::from_name(other) {
                Some(primitive) => parse_primitive_object(primitive, object),
                None if self.knows(other) => Ok(Schema::Reference(other.to_string())),
                None => Err(SchemaError::unsupported(other)),
            },
        }
    }

    fn parse_record(&mut self, object: &Map<String, Value>) -> SchemaResult<Schema> {
        let meta = NamedMeta::from_object(object, "record")?;

        let fields = match object.get("fields") {
            Some(Value::Array(fields)) => fields,
            Some(_) => return Err(SchemaError::wrong_kind("fields", "an array")),
            None => return Err(SchemaError::missing_key("fields", "record")),
        };

        // The record's own name is in scope for its fields
        self.define(&meta.name, meta.namespace.as_deref());

        let fields = fields
            .iter()
            .map(|field| self.parse_field(field))
            .collect::<SchemaResult<Vec<_>>>()?;

        Ok(Schema::Record(RecordSchema {
            name: meta.name,
            namespace: meta.namespace,
            aliases: meta.aliases,
            doc: meta.doc,
            fields,
        }))
    }

    fn parse_field(&mut self, value: &Value) -> SchemaResult<FieldSchema> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::invalid("record field must be an object"))?;

        let name = required_string(object, "name", "field")?;
        let aliases = optional_aliases(object)?;
        let doc = optional_string(object, "doc")?;

        let type_value = object
            .get("type")
            .ok_or_else(|| SchemaError::missing_key("type", "field"))?;
        let schema = self.parse_any(type_value)?;

        let order = match object.get("order") {
            None => None,
            Some(Value::String(s)) => Some(
                Order::from_name(s)
                    .ok_or_else(|| SchemaError::invalid(format!("unknown order '{}'", s)))?,
            ),
            Some(_) => return Err(SchemaError::wrong_kind("order", "a string")),
        };

        Ok(FieldSchema {
            name,
            aliases,
            doc,
            schema,
            default: object.get("default").cloned(),
            order,
        })
    }

    fn parse_enum(&mut self, object: &Map<String, Value>) -> SchemaResult<Schema> {
        let meta = NamedMeta::from_object(object, "enum")?;

        let symbols = match object.get("symbols") {
            Some(Value::Array(symbols)) => symbols
                .iter()
                .map(|s| {
                    s.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| SchemaError::wrong_kind("symbols", "an array of strings"))
                })
                .collect::<SchemaResult<Vec<_>>>()?,
            Some(_) => return Err(SchemaError::wrong_kind("symbols", "an array")),
            None => return Err(SchemaError::missing_key("symbols", "enum")),
        };

        self.define(&meta.name, meta.namespace.as_deref());

        Ok(Schema::Enum(EnumSchema {
            name: meta.name,
            namespace: meta.namespace,
            aliases: meta.aliases,
            doc: meta.doc,
            symbols,
        }))
    }

    fn parse_fixed(&mut self, object: &Map<String, Value>) -> SchemaResult<Schema> {
        let meta = NamedMeta::from_object(object, "fixed")?;

        let size = match object.get("size") {
            Some(v) => non_negative(v, "size")?,
            None => return Err(SchemaError::missing_key("size", "fixed")),
        };

        let mut fixed = match object.get("logicalType") {
            None => FixedSchema::new(meta.name, size)?,
            Some(Value::String(lt)) if lt == "duration" => FixedSchema::duration(meta.name, size)?,
            Some(Value::String(lt)) => {
                return Err(SchemaError::invalid(format!(
                    "logical type '{}' not allowed on fixed",
                    lt
                )))
            }
            Some(_) => return Err(SchemaError::wrong_kind("logicalType", "a string")),
        };
        fixed.namespace = meta.namespace;
        fixed.aliases = meta.aliases;
        fixed.doc = meta.doc;

        self.define(&fixed.name, fixed.namespace.as_deref());

        Ok(Schema::Fixed(fixed))
    }
}

/// Object-form primitive, optionally refined by a logical type.
///
/// Without `logicalType` the object is the plain primitive; `{"type":"int"}`
/// and `"int"` parse to the same schema.
fn parse_primitive_object(
    primitive: Primitive,
    object: &Map<String, Value>,
) -> SchemaResult<Schema> {
    let logical_name = match object.get("logicalType") {
        None => return Ok(Schema::Primitive(primitive)),
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(SchemaError::wrong_kind("logicalType", "a string")),
    };

    if !matches!(primitive, Primitive::Int | Primitive::Long | Primitive::Bytes) {
        return Err(SchemaError::invalid(format!(
            "logical type '{}' not allowed on '{}'",
            logical_name, primitive
        )));
    }

    let representation = match object.get("representation") {
        None => None,
        Some(Value::String(s)) => Some(TimestampRepr::from_name(s).ok_or_else(|| {
            SchemaError::invalid(format!("unknown timestamp representation '{}'", s))
        })?),
        Some(_) => return Err(SchemaError::wrong_kind("representation", "a string")),
    };
    if representation.is_some() && logical_name != "timestamp" {
        return Err(SchemaError::invalid(
            "'representation' is only allowed on timestamps",
        ));
    }

    let logical = match logical_name {
        "date" => LogicalKind::Date,
        "time" => LogicalKind::Time,
        "timestamp" => LogicalKind::Timestamp(representation.unwrap_or_default()),
        "decimal" => {
            let precision = match object.get("precision") {
                Some(v) => to_u32(non_negative(v, "precision")?, "precision")?,
                None => return Err(SchemaError::missing_key("precision", "decimal")),
            };
            let scale = match object.get("scale") {
                Some(v) => Some(to_u32(non_negative(v, "scale")?, "scale")?),
                None => None,
            };
            LogicalKind::Decimal { precision, scale }
        }
        other => {
            return Err(SchemaError::invalid(format!(
                "logical type '{}' not allowed on '{}'",
                other, primitive
            )))
        }
    };

    let mut derived = DerivedPrimitive::new(primitive, logical)?;
    if let Some(doc) = optional_string(object, "doc")? {
        derived = derived.with_doc(doc);
    }
    Ok(Schema::Derived(derived))
}

/// Name, namespace, aliases and doc shared by named types
struct NamedMeta {
    name: String,
    namespace: Option<String>,
    aliases: Vec<String>,
    doc: Option<String>,
}

impl NamedMeta {
    fn from_object(object: &Map<String, Value>, context: &str) -> SchemaResult<Self> {
        let name = required_string(object, "name", context)?;
        if name.is_empty() {
            return Err(SchemaError::invalid(format!("{} name must not be empty", context)));
        }
        Ok(Self {
            name,
            namespace: optional_string(object, "namespace")?,
            aliases: optional_aliases(object)?,
            doc: optional_string(object, "doc")?,
        })
    }
}

fn required_string(object: &Map<String, Value>, key: &str, context: &str) -> SchemaResult<String> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SchemaError::wrong_kind(key, "a string")),
        None => Err(SchemaError::missing_key(key, context)),
    }
}

fn optional_string(object: &Map<String, Value>, key: &str) -> SchemaResult<Option<String>> {
    match object.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::wrong_kind(key, "a string")),
    }
}

fn optional_aliases(object: &Map<String, Value>) -> SchemaResult<Vec<String>> {
    match object.get("aliases") {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|alias| {
                alias
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| SchemaError::wrong_kind("aliases", "an array of strings"))
            })
            .collect(),
        Some(_) => Err(SchemaError::wrong_kind("aliases", "an array")),
    }
}

fn non_negative(value: &Value, key: &str) -> SchemaResult<u64> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u)
            } else if n.as_i64().is_some() {
                Err(SchemaError::invalid(format!("'{}' must not be negative", key)))
            } else {
                Err(SchemaError::wrong_kind(key, "an integer"))
            }
        }
        _ => Err(SchemaError::wrong_kind(key, "an integer")),
    }
}

fn to_u32(value: u64, key: &str) -> SchemaResult<u32> {
    u32::try_from(value).map_err(|_| SchemaError::invalid(format!("'{}' is out of range", key)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> Schema {
        parse_str(text, &[]).unwrap()
    }

    fn parse_err(text: &str) -> SchemaError {
        parse_str(text, &[]).unwrap_err()
    }

    #[test]
    fn test_primitive_string() {
        assert_eq!(parse_ok("\"long\""), Schema::Primitive(Primitive::Long));
        assert!(parse_err("\"something\"").is_unsupported_type());
    }

    #[test]
    fn test_malformed_json_is_invalid() {
        assert!(parse_err("{\"type\":").is_invalid_schema());
        assert!(parse_err("0").is_invalid_schema());
    }

    #[test]
    fn test_union_branches_keep_order() {
        let schema = parse_ok(r#"["string","null","int"]"#);
        assert_eq!(
            schema,
            Schema::Union(vec![
                Primitive::String.into(),
                Schema::NULL,
                Primitive::Int.into()
            ])
        );
    }

    #[test]
    fn test_union_errors() {
        assert!(parse_err("[]").is_invalid_schema());
        assert!(parse_err(r#"[0,"string"]"#).is_invalid_schema());
        assert!(parse_err(r#"["something","string"]"#).is_unsupported_type());
    }

    #[test]
    fn test_union_of_unions_accepted() {
        let schema = parse_ok(r#"[["null","int"],"string"]"#);
        assert!(matches!(schema, Schema::Union(ref b) if matches!(b[0], Schema::Union(_))));
    }

    #[test]
    fn test_self_reference() {
        let schema = parse_ok(
            r#"{"type":"record","name":"LongList","fields":[{"name":"next","type":["null","LongList"]}]}"#,
        );
        let record = schema.as_record().unwrap();
        assert_eq!(
            record.fields[0].schema,
            Schema::Union(vec![Schema::NULL, Schema::Reference("LongList".into())])
        );
    }

    #[test]
    fn test_namespaced_self_reference() {
        let schema = parse_ok(
            r#"{"type":"record","namespace":"test","name":"Node","fields":[{"name":"next","type":["null","test.Node"]}]}"#,
        );
        assert!(schema.as_record().is_some());
    }

    #[test]
    fn test_ancestor_reference() {
        let ancestors = vec!["Outer".to_string()];
        assert_eq!(
            parse_str("\"Outer\"", &ancestors).unwrap(),
            Schema::Reference("Outer".into())
        );
    }

    #[test]
    fn test_earlier_sibling_named_type_in_scope() {
        let schema = parse_ok(
            r#"{"type":"record","name":"r","fields":[{"name":"a","type":{"type":"enum","name":"color","symbols":["RED"]}},{"name":"b","type":"color"}]}"#,
        );
        let record = schema.as_record().unwrap();
        assert_eq!(record.fields[1].schema, Schema::Reference("color".into()));
    }

    #[test]
    fn test_field_errors() {
        assert!(parse_err(r#"{"type":"record","name":"r","fields":[{"name":"a"}]}"#)
            .is_invalid_schema());
        assert!(parse_err(
            r#"{"type":"record","name":"r","fields":[{"name":"a","type":"int","order":"sideways"}]}"#
        )
        .is_invalid_schema());
        assert!(parse_err(
            r#"{"type":"record","name":"r","fields":[{"name":"a","type":"int","order":0}]}"#
        )
        .is_invalid_schema());
        assert!(parse_err(r#"{"type":"record","name":"r","fields":[{"type":"int"}]}"#)
            .is_invalid_schema());
    }

    #[test]
    fn test_field_order_and_default_kept() {
        let schema = parse_ok(
            r#"{"type":"record","name":"r","fields":[{"name":"value","type":"long","default":0,"order":"ignore"}]}"#,
        );
        let field = &schema.as_record().unwrap().fields[0];
        assert_eq!(field.order, Some(Order::Ignore));
        assert_eq!(field.default, Some(serde_json::json!(0)));
    }

    #[test]
    fn test_record_errors() {
        assert!(parse_err(r#"{"type":"record","fields":[]}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"record","name":"r"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"record","name":"r","fields":"something"}"#)
            .is_invalid_schema());
        assert!(
            parse_err(r#"{"type":"record","name":"r","aliases":"something","fields":[]}"#)
                .is_invalid_schema()
        );
        assert!(parse_err(r#"{"type":"record","name":"r","aliases":[0],"fields":[]}"#)
            .is_invalid_schema());
        assert!(parse_err(r#"{"type":"record","name":"","fields":[]}"#).is_invalid_schema());
    }

    #[test]
    fn test_container_errors() {
        assert!(parse_err(r#"{"type":"array","values":"int"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"map","items":"int"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"items":"int"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":0}"#).is_invalid_schema());
    }

    #[test]
    fn test_enum_errors() {
        assert!(parse_err(r#"{"type":"enum","name":"e"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"enum","name":"e","symbols":"A"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"enum","name":0,"symbols":["A"]}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"enum","name":"e","symbols":[0]}"#).is_invalid_schema());
        assert!(
            parse_err(r#"{"type":"enum","name":"e","namespace":0,"symbols":["A"]}"#)
                .is_invalid_schema()
        );
        assert!(parse_err(r#"{"type":"enum","name":"e","doc":0,"symbols":["A"]}"#)
            .is_invalid_schema());
    }

    #[test]
    fn test_fixed() {
        let schema = parse_ok(r#"{"type":"fixed","name":"md5","size":16}"#);
        assert!(matches!(schema, Schema::Fixed(ref f) if f.size() == 16 && !f.is_duration()));

        assert!(parse_err(r#"{"type":"fixed","name":"md5"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"fixed","name":"md5","size":"16"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"fixed","name":"md5","size":-1}"#).is_invalid_schema());
    }

    #[test]
    fn test_fixed_duration() {
        let schema = parse_ok(r#"{"type":"fixed","logicalType":"duration","name":"d","size":12}"#);
        assert!(matches!(schema, Schema::Fixed(ref f) if f.is_duration()));

        assert!(
            parse_err(r#"{"type":"fixed","logicalType":"duration","name":"d","size":16}"#)
                .is_invalid_schema()
        );
        assert!(
            parse_err(r#"{"type":"fixed","logicalType":"timestamp","name":"d","size":12}"#)
                .is_invalid_schema()
        );
    }

    #[test]
    fn test_decimal_validation() {
        let schema = parse_ok(r#"{"type":"bytes","logicalType":"decimal","precision":10,"scale":2}"#);
        match schema {
            Schema::Derived(d) => assert_eq!(
                d.logical(),
                LogicalKind::Decimal {
                    precision: 10,
                    scale: Some(2)
                }
            ),
            other => panic!("expected derived, got {:?}", other),
        }

        assert!(parse_err(r#"{"type":"bytes","logicalType":"decimal"}"#).is_invalid_schema());
        assert!(
            parse_err(r#"{"type":"bytes","logicalType":"decimal","precision":-1}"#)
                .is_invalid_schema()
        );
        assert!(
            parse_err(r#"{"type":"bytes","logicalType":"decimal","precision":4,"scale":-2}"#)
                .is_invalid_schema()
        );
        assert!(
            parse_err(r#"{"type":"bytes","logicalType":"decimal","precision":4.5}"#)
                .is_invalid_schema()
        );
        assert!(
            parse_err(r#"{"type":"int","logicalType":"decimal","precision":4}"#)
                .is_invalid_schema()
        );
    }

    #[test]
    fn test_derived_temporal() {
        let schema = parse_ok(r#"{"type":"long","logicalType":"timestamp","representation":"wallclock"}"#);
        match schema {
            Schema::Derived(d) => {
                assert_eq!(d.base(), Primitive::Long);
                assert_eq!(d.logical(), LogicalKind::Timestamp(TimestampRepr::WallClock));
            }
            other => panic!("expected derived, got {:?}", other),
        }

        assert!(parse_err(r#"{"type":"bytes","logicalType":"date"}"#).is_invalid_schema());
        assert!(parse_err(r#"{"type":"int","logicalType":"duration"}"#).is_invalid_schema());
        assert!(
            parse_err(r#"{"type":"int","logicalType":"date","representation":"wallclock"}"#)
                .is_invalid_schema()
        );
        assert!(parse_err(r#"{"type":"string","logicalType":"uuid"}"#).is_invalid_schema());
    }

    #[test]
    fn test_unknown_object_type() {
        assert!(parse_err(r#"{"type":"something","name":"something"}"#).is_unsupported_type());
    }
}
