//! Limit encoding
//!
//! A JSON scalar for persisting a cursor boundary:
//! - int, long, float, double, epoch timestamp: number
//! - string: string
//! - date: `YYYY-MM-DD`, time: `HH:MM:SS`
//! - wall-clock timestamp: RFC 3339 UTC (`Z`)

use serde_json::{Number, Value};

use super::errors::{CodecError, CodecResult};
use super::slot::{Nullable, Scalar, ScanSlot};
use super::temporal;
use super::value::{SqlValue, TypedValue};
use crate::schema::{LogicalKind, Primitive, Schema, TimestampRepr};

/// Encodes one fetched value typed by `schema` as a limit scalar.
///
/// # Errors
///
/// - `UnsupportedTypeForCriterion` for bytes, fixed and decimal
/// - `InvalidValue` for a null boundary
pub fn encode_limit(schema: &Schema, value: SqlValue) -> CodecResult<Value> {
    let slot = ScanSlot::for_schema(schema)?;
    let read = slot.read(value)?;
    limit_from_slot(&slot, read)
}

/// Encodes a value already read into `slot`
pub fn limit_from_slot(slot: &ScanSlot<'_>, read: Nullable<Scalar>) -> CodecResult<Value> {
    let target = slot.target();
    ensure_limit_type(target)?;
    let scalar = read
        .into_option()
        .ok_or_else(|| CodecError::invalid_value("null cannot be a cursor boundary"))?;
    to_limit(TypedValue::read(target, scalar)?)
}

fn ensure_limit_type(schema: &Schema) -> CodecResult<()> {
    match schema {
        Schema::Derived(d) if matches!(d.logical(), LogicalKind::Decimal { .. }) => {
            Err(CodecError::unsupported_for_criterion(schema.type_tag()))
        }
        Schema::Primitive(Primitive::Bytes) | Schema::Fixed(_) => {
            Err(CodecError::unsupported_for_criterion(schema.type_tag()))
        }
        _ => Ok(()),
    }
}

fn to_limit(value: TypedValue) -> CodecResult<Value> {
    match value {
        TypedValue::Int(v) => Ok(Value::from(v)),
        TypedValue::Long(v) => Ok(Value::from(v)),
        // Shortest f32 text keeps 0.1 as 0.1 instead of its f64 widening
        TypedValue::Float(v) => float_limit(v.to_string().parse().unwrap_or(f64::from(v))),
        TypedValue::Double(v) => float_limit(v),
        TypedValue::String(v) => Ok(Value::String(v)),
        TypedValue::Date { date, .. } => Ok(Value::String(temporal::format_date(date))),
        TypedValue::Time { time, .. } => Ok(Value::String(temporal::format_time(time))),
        TypedValue::Timestamp {
            at,
            repr: TimestampRepr::WallClock,
            ..
        } => Ok(Value::String(temporal::format_rfc3339(at))),
        TypedValue::Timestamp {
            at,
            repr: TimestampRepr::Epoch,
            ..
        } => Ok(Value::from(temporal::datetime_seconds(at))),
        TypedValue::Bytes(_) | TypedValue::Fixed(_) | TypedValue::Decimal(_) => Err(
            CodecError::UnsupportedTypeForCriterion("binary values have no limit encoding".into()),
        ),
    }
}

fn float_limit(v: f64) -> CodecResult<Value> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| CodecError::invalid_value(format!("{} cannot be a cursor boundary", v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DerivedPrimitive;
    use serde_json::json;

    #[test]
    fn test_numbers() {
        assert_eq!(encode_limit(&Primitive::Int.into(), SqlValue::Int(2)).unwrap(), json!(2));
        assert_eq!(
            encode_limit(&Primitive::Float.into(), SqlValue::Float(0.1)).unwrap(),
            json!(0.1)
        );
    }

    #[test]
    fn test_temporal() {
        let date: Schema = DerivedPrimitive::date().into();
        assert_eq!(encode_limit(&date, "2020-02-29".into()).unwrap(), json!("2020-02-29"));

        let time: Schema = DerivedPrimitive::time().into();
        assert_eq!(encode_limit(&time, "23:59:59".into()).unwrap(), json!("23:59:59"));

        let wallclock: Schema = DerivedPrimitive::timestamp(TimestampRepr::WallClock).into();
        assert_eq!(
            encode_limit(&wallclock, "2020-02-29 12:00:00".into()).unwrap(),
            json!("2020-02-29T12:00:00Z")
        );

        let epoch: Schema = DerivedPrimitive::timestamp(TimestampRepr::Epoch).into();
        assert_eq!(encode_limit(&epoch, SqlValue::Int(60)).unwrap(), json!(60));
    }

    #[test]
    fn test_binary_types_unsupported() {
        let decimal: Schema = DerivedPrimitive::decimal(4, None).into();
        for schema in [Primitive::Bytes.into(), decimal] {
            let err = encode_limit(&schema, "1".into()).unwrap_err();
            assert_eq!(err.code(), "UNSUPPORTED_TYPE_FOR_CRITERION");
        }
    }

    #[test]
    fn test_null_boundary_invalid() {
        let schema = Schema::Union(vec![Schema::NULL, Primitive::Long.into()]);
        let err = encode_limit(&schema, SqlValue::Null).unwrap_err();
        assert_eq!(err.code(), "INVALID_VALUE");
        assert_eq!(encode_limit(&schema, SqlValue::Int(9)).unwrap(), json!(9));
    }
}
