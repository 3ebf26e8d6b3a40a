//! Native encoding
//!
//! Temporal values become epoch seconds at their base width; a nullable
//! column becomes `Null` or a `Union` carrying the non-null branch.

use super::errors::{CodecError, CodecResult};
use super::slot::{Nullable, Scalar, ScanSlot};
use super::value::{NativeValue, SqlValue, TypedValue};
use crate::schema::{Primitive, Schema};

/// Encodes one fetched value typed by `schema`
pub fn encode_native(schema: &Schema, value: SqlValue) -> CodecResult<NativeValue> {
    let slot = ScanSlot::for_schema(schema)?;
    let read = slot.read(value)?;
    native_from_slot(&slot, read)
}

/// Encodes a value already read into `slot`
pub fn native_from_slot(slot: &ScanSlot<'_>, read: Nullable<Scalar>) -> CodecResult<NativeValue> {
    let target = slot.target();
    match (slot.branch(), read.into_option()) {
        (_, None) => Ok(NativeValue::Null),
        (None, Some(scalar)) => to_native(TypedValue::read(target, scalar)?),
        (Some(index), Some(scalar)) => Ok(NativeValue::Union {
            index,
            tag: target.type_tag(),
            value: Box::new(to_native(TypedValue::read(target, scalar)?)?),
        }),
    }
}

fn to_native(value: TypedValue) -> CodecResult<NativeValue> {
    let seconds = value.epoch_seconds();
    match value {
        TypedValue::Int(v) => Ok(NativeValue::Int(v)),
        TypedValue::Long(v) => Ok(NativeValue::Long(v)),
        TypedValue::Float(v) => Ok(NativeValue::Float(v)),
        TypedValue::Double(v) => Ok(NativeValue::Double(v)),
        TypedValue::String(v) => Ok(NativeValue::String(v)),
        TypedValue::Bytes(v) => Ok(NativeValue::Bytes(v)),
        TypedValue::Fixed(v) => Ok(NativeValue::Fixed(v)),
        TypedValue::Decimal(d) => Ok(NativeValue::Decimal(d)),
        TypedValue::Date { base, .. }
        | TypedValue::Time { base, .. }
        | TypedValue::Timestamp { base, .. } => {
            let seconds = seconds.unwrap_or_default();
            at_base_width(seconds, base)
        }
    }
}

fn at_base_width(seconds: i64, base: Primitive) -> CodecResult<NativeValue> {
    match base {
        Primitive::Long => Ok(NativeValue::Long(seconds)),
        _ => i32::try_from(seconds).map(NativeValue::Int).map_err(|_| {
            CodecError::invalid_value(format!("{} seconds does not fit in int", seconds))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Decimal;
    use crate::schema::{DerivedPrimitive, LogicalKind, TimestampRepr, TypeTag};

    #[test]
    fn test_plain_scalars() {
        assert_eq!(
            encode_native(&Primitive::Long.into(), SqlValue::Int(5)).unwrap(),
            NativeValue::Long(5)
        );
        assert_eq!(
            encode_native(&Primitive::String.into(), "x".into()).unwrap(),
            NativeValue::String("x".into())
        );
    }

    #[test]
    fn test_nullable_branch_tagging() {
        let schema = Schema::Union(vec![Schema::NULL, Primitive::Int.into()]);
        assert_eq!(encode_native(&schema, SqlValue::Null).unwrap(), NativeValue::Null);
        assert_eq!(
            encode_native(&schema, SqlValue::Int(3)).unwrap(),
            NativeValue::Union {
                index: 1,
                tag: TypeTag::Int,
                value: Box::new(NativeValue::Int(3)),
            }
        );
    }

    #[test]
    fn test_derived_branch_tag() {
        let schema = Schema::Union(vec![DerivedPrimitive::date().into(), Schema::NULL]);
        match encode_native(&schema, "1970-01-03".into()).unwrap() {
            NativeValue::Union { index, tag, value } => {
                assert_eq!(index, 0);
                assert_eq!(tag, TypeTag::Date);
                assert_eq!(*value, NativeValue::Int(172_800));
            }
            other => panic!("expected union, got {:?}", other),
        }
    }

    #[test]
    fn test_temporal_seconds() {
        let time: Schema = DerivedPrimitive::time().into();
        assert_eq!(
            encode_native(&time, "00:10:00".into()).unwrap(),
            NativeValue::Int(600)
        );

        let epoch: Schema = DerivedPrimitive::timestamp(TimestampRepr::Epoch).into();
        assert_eq!(
            encode_native(&epoch, SqlValue::Int(1_500_000_000)).unwrap(),
            NativeValue::Int(1_500_000_000)
        );

        let wide = DerivedPrimitive::new(
            Primitive::Long,
            LogicalKind::Timestamp(TimestampRepr::WallClock),
        )
        .unwrap();
        assert_eq!(
            encode_native(&wide.into(), "2100-01-01 00:00:00".into()).unwrap(),
            NativeValue::Long(4_102_444_800)
        );
    }

    #[test]
    fn test_int_base_overflow_is_invalid_value() {
        let wallclock: Schema = DerivedPrimitive::timestamp(TimestampRepr::WallClock).into();
        let err = encode_native(&wallclock, "2100-01-01 00:00:00".into()).unwrap_err();
        assert_eq!(err.code(), "INVALID_VALUE");
    }

    #[test]
    fn test_decimal_stays_exact() {
        let schema: Schema = DerivedPrimitive::decimal(10, Some(2)).into();
        assert_eq!(
            encode_native(&schema, SqlValue::Bytes(b"1234.56".to_vec())).unwrap(),
            NativeValue::Decimal(Decimal::parse("1234.56").unwrap())
        );
    }

    #[test]
    fn test_union_shape_rejected() {
        let three = Schema::Union(vec![
            Schema::NULL,
            Primitive::Int.into(),
            Primitive::Long.into(),
        ]);
        let err = encode_native(&three, SqlValue::Int(1)).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_TYPE_FOR_SQL");
    }
}
