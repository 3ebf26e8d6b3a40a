//! avroscan - Avro-style schemas for relational tables
//!
//! Schema model with an exact JSON codec, mapping of relational columns to
//! schema fields, per-value encoding of fetched rows, and keyset-paginated
//! scans that resume from a serializable cursor.

pub mod cli;
pub mod codec;
pub mod criterion;
pub mod export;
pub mod mapper;
pub mod observability;
pub mod schema;
