//! Comparable criterion types
//!
//! The field types a keyset scan can be bounded on, and how a stored limit
//! of each type is bound as a statement parameter.

use serde_json::Value;

use super::errors::{CriterionError, CriterionResult};
use crate::codec::{temporal, SqlValue};
use crate::schema::{FieldSchema, LogicalKind, Primitive, Schema, TimestampRepr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionType {
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Date,
    Time,
    Timestamp(TimestampRepr),
}

impl CriterionType {
    /// Classifies a field's type, looking through one nullable union.
    ///
    /// # Errors
    ///
    /// `UnsupportedTypeForCriterion` for bytes, fixed, decimal, enum,
    /// complex types and unions that are not nullable scalars.
    pub fn classify(field: &FieldSchema) -> CriterionResult<Self> {
        let schema = match &field.schema {
            Schema::Union(_) => match field.schema.nullable_inner() {
                Some((_, inner)) => inner,
                None => return Err(CriterionError::unsupported(&field.name, field.schema.type_tag())),
            },
            other => other,
        };
        let unsupported = || CriterionError::unsupported(&field.name, schema.type_tag());

        match schema {
            Schema::Primitive(p) => match p {
                Primitive::Int => Ok(CriterionType::Int32),
                Primitive::Long => Ok(CriterionType::Int64),
                Primitive::Float => Ok(CriterionType::Float32),
                Primitive::Double => Ok(CriterionType::Float64),
                Primitive::String => Ok(CriterionType::String),
                Primitive::Null | Primitive::Boolean | Primitive::Bytes => Err(unsupported()),
            },
            Schema::Derived(d) => match d.logical() {
                LogicalKind::Date => Ok(CriterionType::Date),
                LogicalKind::Time => Ok(CriterionType::Time),
                LogicalKind::Timestamp(repr) => Ok(CriterionType::Timestamp(repr)),
                LogicalKind::Decimal { .. } => Err(unsupported()),
            },
            _ => Err(unsupported()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CriterionType::Int32 => "int32",
            CriterionType::Int64 => "int64",
            CriterionType::Float32 => "float32",
            CriterionType::Float64 => "float64",
            CriterionType::String => "string",
            CriterionType::Date => "date",
            CriterionType::Time => "time",
            CriterionType::Timestamp(TimestampRepr::WallClock) => "datetime",
            CriterionType::Timestamp(TimestampRepr::Epoch) => "timestamp",
        }
    }

    /// Converts a stored limit into the statement parameter that bounds
    /// `field`.
    ///
    /// Wall-clock timestamps are stored as RFC 3339 and bound in the
    /// relational `YYYY-MM-DD HH:MM:SS` layout.
    ///
    /// # Errors
    ///
    /// `InvalidLimit` if the JSON shape or text does not fit this type.
    pub fn bind(&self, field: &str, limit: &Value) -> CriterionResult<SqlValue> {
        let invalid = || {
            CriterionError::invalid_limit(field, format!("{} does not fit {}", limit, self.name()))
        };
        match self {
            CriterionType::Int32 => {
                let v = limit.as_i64().ok_or_else(invalid)?;
                i32::try_from(v).map_err(|_| invalid())?;
                Ok(SqlValue::Int(v))
            }
            CriterionType::Int64 | CriterionType::Timestamp(TimestampRepr::Epoch) => {
                limit.as_i64().map(SqlValue::Int).ok_or_else(invalid)
            }
            CriterionType::Float32 | CriterionType::Float64 => {
                limit.as_f64().map(SqlValue::Float).ok_or_else(invalid)
            }
            CriterionType::String => limit
                .as_str()
                .map(|s| SqlValue::Text(s.to_string()))
                .ok_or_else(invalid),
            CriterionType::Date => {
                let text = limit.as_str().ok_or_else(invalid)?;
                temporal::parse_date(text).map_err(|e| CriterionError::invalid_limit(field, e))?;
                Ok(SqlValue::from(text))
            }
            CriterionType::Time => {
                let text = limit.as_str().ok_or_else(invalid)?;
                temporal::parse_time(text).map_err(|e| CriterionError::invalid_limit(field, e))?;
                Ok(SqlValue::from(text))
            }
            CriterionType::Timestamp(TimestampRepr::WallClock) => {
                let text = limit.as_str().ok_or_else(invalid)?;
                let at = temporal::parse_rfc3339(text)
                    .map_err(|e| CriterionError::invalid_limit(field, e))?;
                Ok(SqlValue::Text(temporal::format_datetime(at)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DerivedPrimitive, FixedSchema};
    use serde_json::json;

    fn field(schema: Schema) -> FieldSchema {
        FieldSchema::new("f", schema)
    }

    #[test]
    fn test_classify_scalars() {
        assert_eq!(
            CriterionType::classify(&field(Primitive::Int.into())).unwrap(),
            CriterionType::Int32
        );
        assert_eq!(
            CriterionType::classify(&field(Primitive::Double.into())).unwrap(),
            CriterionType::Float64
        );
        assert_eq!(
            CriterionType::classify(&field(DerivedPrimitive::date().into())).unwrap(),
            CriterionType::Date
        );
        assert_eq!(
            CriterionType::classify(&field(
                DerivedPrimitive::timestamp(TimestampRepr::WallClock).into()
            ))
            .unwrap(),
            CriterionType::Timestamp(TimestampRepr::WallClock)
        );
    }

    #[test]
    fn test_classify_unwraps_nullable() {
        let schema = Schema::Union(vec![Schema::NULL, Primitive::Long.into()]);
        assert_eq!(CriterionType::classify(&field(schema)).unwrap(), CriterionType::Int64);
    }

    #[test]
    fn test_classify_rejects_non_comparable() {
        let rejected: Vec<Schema> = vec![
            Primitive::Bytes.into(),
            Primitive::Boolean.into(),
            DerivedPrimitive::decimal(10, Some(2)).into(),
            Schema::Fixed(FixedSchema::new("code", 4).unwrap()),
            Schema::Union(vec![Primitive::Int.into(), Primitive::String.into()]),
            Schema::Union(vec![
                Schema::NULL,
                Schema::Union(vec![Schema::NULL, Primitive::Int.into()]),
            ]),
        ];
        for schema in rejected {
            let err = CriterionType::classify(&field(schema.clone())).unwrap_err();
            assert_eq!(err.code(), "UNSUPPORTED_TYPE_FOR_CRITERION", "{:?}", schema);
        }
    }

    #[test]
    fn test_bind_numbers() {
        assert_eq!(CriterionType::Int32.bind("f", &json!(2)).unwrap(), SqlValue::Int(2));
        assert_eq!(
            CriterionType::Float64.bind("f", &json!(1.5)).unwrap(),
            SqlValue::Float(1.5)
        );
        let err = CriterionType::Int32.bind("f", &json!(3_000_000_000i64)).unwrap_err();
        assert_eq!(err.code(), "INVALID_CRITERION_LIMIT");
        assert!(CriterionType::Int64.bind("f", &json!("2")).is_err());
    }

    #[test]
    fn test_bind_wallclock_rebinds_layout() {
        let repr = CriterionType::Timestamp(TimestampRepr::WallClock);
        assert_eq!(
            repr.bind("f", &json!("2021-03-04T05:06:07Z")).unwrap(),
            SqlValue::from("2021-03-04 05:06:07")
        );
        assert!(repr.bind("f", &json!("2021-03-04 05:06:07")).is_err());
    }

    #[test]
    fn test_bind_date_and_time_validated() {
        assert_eq!(
            CriterionType::Date.bind("f", &json!("2020-01-31")).unwrap(),
            SqlValue::from("2020-01-31")
        );
        assert!(CriterionType::Date.bind("f", &json!("2020-02-31")).is_err());
        assert!(CriterionType::Time.bind("f", &json!("25:00:00")).is_err());
    }
}
