//! Schema type definitions
//!
//! A schema is a closed tree of variants:
//! - Primitive: null, boolean, int, long, float, double, bytes, string
//! - DerivedPrimitive: a primitive refined by a logical type
//! - Array, Map: homogeneous containers
//! - Union: ordered choice among schemas
//! - Record, Enum, Fixed: named types
//! - Reference: bare name of an enclosing named type
//!
//! Schemas are immutable once constructed. Validated variants (decimal,
//! duration) keep their fields private so the constructor checks cannot be
//! bypassed.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};

/// Primitive types, identified by their wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Null,
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 32-bit IEEE 754 float
    Float,
    /// 64-bit IEEE 754 float
    Double,
    Bytes,
    String,
}

impl Primitive {
    /// Returns the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Bytes => "bytes",
            Primitive::String => "string",
        }
    }

    /// Resolves a wire name to a primitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Primitive::Null),
            "boolean" => Some(Primitive::Boolean),
            "int" => Some(Primitive::Int),
            "long" => Some(Primitive::Long),
            "float" => Some(Primitive::Float),
            "double" => Some(Primitive::Double),
            "bytes" => Some(Primitive::Bytes),
            "string" => Some(Primitive::String),
            _ => None,
        }
    }

    /// Returns the matching type tag
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Primitive::Null => TypeTag::Null,
            Primitive::Boolean => TypeTag::Boolean,
            Primitive::Int => TypeTag::Int,
            Primitive::Long => TypeTag::Long,
            Primitive::Float => TypeTag::Float,
            Primitive::Double => TypeTag::Double,
            Primitive::Bytes => TypeTag::Bytes,
            Primitive::String => TypeTag::String,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Physical shape of the source column behind a timestamp.
///
/// Epoch columns hold integer seconds; wall-clock columns hold
/// `YYYY-MM-DD HH:MM:SS` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimestampRepr {
    #[default]
    Epoch,
    WallClock,
}

impl TimestampRepr {
    /// Returns the wire name
    pub fn name(&self) -> &'static str {
        match self {
            TimestampRepr::Epoch => "epoch",
            TimestampRepr::WallClock => "wallclock",
        }
    }

    /// Resolves a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "epoch" => Some(TimestampRepr::Epoch),
            "wallclock" => Some(TimestampRepr::WallClock),
            _ => None,
        }
    }
}

/// Logical refinement carried by a derived primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKind {
    Date,
    Time,
    Timestamp(TimestampRepr),
    /// Fixed point decimal stored as bytes
    Decimal {
        /// Total number of digits
        precision: u32,
        /// Digits right of the decimal point
        scale: Option<u32>,
    },
}

impl LogicalKind {
    /// Returns the wire `logicalType` value
    pub fn name(&self) -> &'static str {
        match self {
            LogicalKind::Date => "date",
            LogicalKind::Time => "time",
            LogicalKind::Timestamp(_) => "timestamp",
            LogicalKind::Decimal { .. } => "decimal",
        }
    }

    /// Returns the matching type tag
    pub fn type_tag(&self) -> TypeTag {
        match self {
            LogicalKind::Date => TypeTag::Date,
            LogicalKind::Time => TypeTag::Time,
            LogicalKind::Timestamp(_) => TypeTag::Timestamp,
            LogicalKind::Decimal { .. } => TypeTag::Decimal,
        }
    }
}

/// A primitive refined by a logical type.
///
/// Date, time and timestamp require an `int` or `long` base; decimal requires
/// `bytes`. Checked at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPrimitive {
    base: Primitive,
    logical: LogicalKind,
    doc: Option<String>,
}

impl DerivedPrimitive {
    /// Creates a derived primitive, validating the base/logical pairing
    pub fn new(base: Primitive, logical: LogicalKind) -> SchemaResult<Self> {
        match logical {
            LogicalKind::Date | LogicalKind::Time | LogicalKind::Timestamp(_) => {
                if !matches!(base, Primitive::Int | Primitive::Long) {
                    return Err(SchemaError::invalid(format!(
                        "logical type '{}' requires an int or long base, got '{}'",
                        logical.name(),
                        base
                    )));
                }
            }
            LogicalKind::Decimal { .. } => {
                if base != Primitive::Bytes {
                    return Err(SchemaError::invalid(format!(
                        "logical type 'decimal' requires a bytes base, got '{}'",
                        base
                    )));
                }
            }
        }
        Ok(Self {
            base,
            logical,
            doc: None,
        })
    }

    /// `int` date
    pub fn date() -> Self {
        Self {
            base: Primitive::Int,
            logical: LogicalKind::Date,
            doc: None,
        }
    }

    /// `int` time of day
    pub fn time() -> Self {
        Self {
            base: Primitive::Int,
            logical: LogicalKind::Time,
            doc: None,
        }
    }

    /// `int` timestamp with the given source representation
    pub fn timestamp(repr: TimestampRepr) -> Self {
        Self {
            base: Primitive::Int,
            logical: LogicalKind::Timestamp(repr),
            doc: None,
        }
    }

    /// `bytes` decimal
    pub fn decimal(precision: u32, scale: Option<u32>) -> Self {
        Self {
            base: Primitive::Bytes,
            logical: LogicalKind::Decimal { precision, scale },
            doc: None,
        }
    }

    /// Attaches documentation text
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn base(&self) -> Primitive {
        self.base
    }

    pub fn logical(&self) -> LogicalKind {
        self.logical
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

/// Per-field sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
    Ignore,
}

impl Order {
    /// Returns the wire name
    pub fn name(&self) -> &'static str {
        match self {
            Order::Ascending => "ascending",
            Order::Descending => "descending",
            Order::Ignore => "ignore",
        }
    }

    /// Resolves a wire name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ascending" => Some(Order::Ascending),
            "descending" => Some(Order::Descending),
            "ignore" => Some(Order::Ignore),
            _ => None,
        }
    }
}

/// A record field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub aliases: Vec<String>,
    pub doc: Option<String>,
    pub schema: Schema,
    /// Opaque JSON default, kept as parsed
    pub default: Option<Value>,
    /// `None` when the wire form omits `order` (ascending)
    pub order: Option<Order>,
}

impl FieldSchema {
    /// Creates a field with no aliases, doc, default or order
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            doc: None,
            schema,
            default: None,
            order: None,
        }
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Effective order (ascending when omitted)
    pub fn effective_order(&self) -> Order {
        self.order.unwrap_or_default()
    }

    /// Column name used in SQL: first alias, else the field name
    pub fn sql_name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(&self.name)
    }

    /// Returns true if `name` is the field name or one of its aliases
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}

/// Named record type
///
/// Built through [`RecordSchema::new`] or the parser, so the name is never
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub(super) name: String,
    pub(super) namespace: Option<String>,
    pub(super) aliases: Vec<String>,
    pub(super) doc: Option<String>,
    pub(super) fields: Vec<FieldSchema>,
}

impl RecordSchema {
    /// Creates a record, rejecting an empty name
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> SchemaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::invalid("record name must not be empty"));
        }
        Ok(Self {
            name,
            namespace: None,
            aliases: Vec::new(),
            doc: None,
            fields,
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Looks a field up by name or alias
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.answers_to(name))
    }

    /// Position of a field looked up by name or alias
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.answers_to(name))
    }

    /// Table name used in SQL: first alias, else the record name
    pub fn sql_name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(&self.name)
    }
}

/// Named enumeration type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    pub name: String,
    pub namespace: Option<String>,
    pub aliases: Vec<String>,
    pub doc: Option<String>,
    pub symbols: Vec<String>,
}

impl EnumSchema {
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> SchemaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::invalid("enum name must not be empty"));
        }
        Ok(Self {
            name,
            namespace: None,
            aliases: Vec::new(),
            doc: None,
            symbols,
        })
    }
}

/// Named fixed-size byte type, optionally carrying the duration logical type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSchema {
    pub name: String,
    pub namespace: Option<String>,
    pub aliases: Vec<String>,
    pub doc: Option<String>,
    size: u64,
    duration: bool,
}

/// Byte size mandated for the duration logical type
pub const DURATION_SIZE: u64 = 12;

impl FixedSchema {
    /// Creates a plain fixed type
    pub fn new(name: impl Into<String>, size: u64) -> SchemaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::invalid("fixed name must not be empty"));
        }
        Ok(Self {
            name,
            namespace: None,
            aliases: Vec::new(),
            doc: None,
            size,
            duration: false,
        })
    }

    /// Creates a fixed type carrying the duration logical type (size 12)
    pub fn duration(name: impl Into<String>, size: u64) -> SchemaResult<Self> {
        if size != DURATION_SIZE {
            return Err(SchemaError::invalid(format!(
                "duration requires size {}, got {}",
                DURATION_SIZE, size
            )));
        }
        let mut fixed = Self::new(name, size)?;
        fixed.duration = true;
        Ok(fixed)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_duration(&self) -> bool {
        self.duration
    }
}

/// Closed set of type discriminants used for dispatch and union branch tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Date,
    Time,
    Timestamp,
    Decimal,
    Duration,
    Array,
    Map,
    Record,
    Enum,
    Fixed,
    Union,
    Reference,
}

impl TypeTag {
    /// Returns the tag name for messages and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Int => "int",
            TypeTag::Long => "long",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
            TypeTag::Bytes => "bytes",
            TypeTag::String => "string",
            TypeTag::Date => "date",
            TypeTag::Time => "time",
            TypeTag::Timestamp => "timestamp",
            TypeTag::Decimal => "decimal",
            TypeTag::Duration => "duration",
            TypeTag::Array => "array",
            TypeTag::Map => "map",
            TypeTag::Record => "record",
            TypeTag::Enum => "enum",
            TypeTag::Fixed => "fixed",
            TypeTag::Union => "union",
            TypeTag::Reference => "reference",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A schema node
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Primitive(Primitive),
    Derived(DerivedPrimitive),
    Array(Box<Schema>),
    Map(Box<Schema>),
    /// Ordered branches, never reordered or deduplicated
    Union(Vec<Schema>),
    Record(RecordSchema),
    Enum(EnumSchema),
    Fixed(FixedSchema),
    /// Back-reference to an enclosing named type, resolved by name
    Reference(String),
}

impl Schema {
    pub const NULL: Schema = Schema::Primitive(Primitive::Null);

    /// Returns the dispatch tag of this node
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Schema::Primitive(p) => p.type_tag(),
            Schema::Derived(d) => d.logical().type_tag(),
            Schema::Array(_) => TypeTag::Array,
            Schema::Map(_) => TypeTag::Map,
            Schema::Union(_) => TypeTag::Union,
            Schema::Record(_) => TypeTag::Record,
            Schema::Enum(_) => TypeTag::Enum,
            Schema::Fixed(f) if f.is_duration() => TypeTag::Duration,
            Schema::Fixed(_) => TypeTag::Fixed,
            Schema::Reference(_) => TypeTag::Reference,
        }
    }

    /// Name of a named type or reference
    pub fn name(&self) -> Option<&str> {
        match self {
            Schema::Record(r) => Some(&r.name),
            Schema::Enum(e) => Some(&e.name),
            Schema::Fixed(f) => Some(&f.name),
            Schema::Reference(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Schema::Primitive(Primitive::Null))
    }

    pub fn as_record(&self) -> Option<&RecordSchema> {
        match self {
            Schema::Record(r) => Some(r),
            _ => None,
        }
    }

    /// For a two-branch union with exactly one null branch, returns the other
    /// branch and its index.
    pub fn nullable_inner(&self) -> Option<(usize, &Schema)> {
        match self {
            Schema::Union(branches) if branches.len() == 2 => {
                match (branches[0].is_null(), branches[1].is_null()) {
                    (true, false) => Some((1, &branches[1])),
                    (false, true) => Some((0, &branches[0])),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Returns true for the nullable-scalar union shape
    pub fn is_nullable(&self) -> bool {
        self.nullable_inner().is_some()
    }

    /// Wraps `base` as a nullable union. Null goes first unless the default
    /// is a non-null value, matching the rule that the first branch types
    /// the default.
    pub fn nullable(base: Schema, has_non_null_default: bool) -> Schema {
        if has_non_null_default {
            Schema::Union(vec![base, Schema::NULL])
        } else {
            Schema::Union(vec![Schema::NULL, base])
        }
    }
}

impl From<Primitive> for Schema {
    fn from(p: Primitive) -> Self {
        Schema::Primitive(p)
    }
}

impl From<DerivedPrimitive> for Schema {
    fn from(d: DerivedPrimitive) -> Self {
        Schema::Derived(d)
    }
}
