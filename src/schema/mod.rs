//! Schema model and JSON codec
//!
//! A closed, immutable type tree for records, collections, unions and
//! logically refined primitives, with a byte-exact JSON wire form.
//!
//! # Design Principles
//!
//! - Exhaustive matching over a closed variant set
//! - Validated variants checked at construction
//! - Recursive types expressed as name references, never owning cycles
//! - Round trip: `serialize(parse(x)) == x` for canonical input

mod errors;
mod parser;
mod types;
mod writer;

pub use errors::{SchemaError, SchemaResult};
pub use parser::{parse, parse_str, parse_value};
pub use types::{
    DerivedPrimitive, EnumSchema, FieldSchema, FixedSchema, LogicalKind, Order, Primitive,
    RecordSchema, Schema, TimestampRepr, TypeTag, DURATION_SIZE,
};
pub use writer::{serialize, to_json_string};
