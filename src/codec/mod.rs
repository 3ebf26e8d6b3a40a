//! Value codec
//!
//! Converts one fetched relational value, given its schema, into:
//! - a native value (container serialization)
//! - a text cell (tabular export)
//! - a limit scalar (cursor persistence)
//!
//! All three go through the same slot selection and the same typed read.
//! Only the nullable-scalar subset of unions is readable; other union
//! shapes fail with `UNSUPPORTED_TYPE_FOR_SQL` even though the schema codec
//! accepts them.

mod decimal;
mod errors;
mod limit;
mod native;
mod row;
mod slot;
pub mod temporal;
mod text;
mod value;

pub use decimal::Decimal;
pub use errors::{CodecError, CodecResult};
pub use limit::{encode_limit, limit_from_slot};
pub use native::{encode_native, native_from_slot};
pub use row::{encode_native_row, encode_text_row, EncodedRow, NativeRecord, RowCodec, TextRow};
pub use slot::{Nullable, Scalar, ScanSlot, SlotKind};
pub use text::{encode_text, text_from_slot};
pub use value::{NativeValue, SqlValue, TypedValue};
