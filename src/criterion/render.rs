//! Statement rendering
//!
//! ```text
//! SELECT `a`,`b` FROM `db`.`table` [WHERE `a`>=? [AND ...]] [ORDER BY `a`,... ASC|DESC] LIMIT ?
//! ```
//!
//! Identifiers are escaped and interpolated; limits are always bound as
//! parameters.

use super::criterion::{ensure_types, Criterion};
use super::errors::{CriterionError, CriterionResult};
use crate::codec::SqlValue;
use crate::observability::{log_event, Event};
use crate::schema::{RecordSchema, Schema};

const ESCAPED: [char; 6] = ['\'', '`', '(', ';', '*', '\\'];

/// A rendered statement and its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: Vec<SqlValue>,
}

/// Backslash-prefixes SQL metacharacters in an identifier
pub fn escape(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    for c in identifier.chars() {
        if ESCAPED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Returns `schema` as a non-empty record
pub fn expect_record(schema: &Schema) -> CriterionResult<&RecordSchema> {
    let record = schema.as_record().ok_or_else(|| {
        CriterionError::ExpectRecordSchema(format!("got '{}'", schema.type_tag()))
    })?;
    if record.fields().is_empty() {
        return Err(CriterionError::ExpectRecordSchema(format!(
            "record '{}' has no fields",
            record.name()
        )));
    }
    Ok(record)
}

/// Renders the page query for `schema`.
///
/// # Arguments
///
/// * `db_name` - Database qualifying the table
/// * `schema` - Record describing the table; the first alias of the record
///   and of each field is the real SQL name
/// * `limit` - Maximum rows to fetch
/// * `criteria` - Keyset criteria; only those with a limit add a WHERE term
///
/// # Errors
///
/// - `ExpectRecordSchema` for a non-record or empty record
/// - `CriterionUnknownField` / `UnsupportedTypeForCriterion` from type checks
/// - `CannotIgnoreOrder` / `MixedOrder` for unusable directions
/// - `InvalidLimit` for a limit that does not fit its field
pub fn render_query(
    db_name: &str,
    schema: &Schema,
    limit: u64,
    criteria: &[Criterion],
) -> CriterionResult<Statement> {
    let record = expect_record(schema)?;
    let mut criteria = criteria.to_vec();
    ensure_types(record, &mut criteria)?;

    let columns = record
        .fields()
        .iter()
        .map(|f| format!("`{}`", escape(f.sql_name())))
        .collect::<Vec<_>>()
        .join(",");
    let mut text = format!(
        "SELECT {} FROM `{}`.`{}`",
        columns,
        escape(db_name),
        escape(record.sql_name())
    );
    let mut params = Vec::with_capacity(criteria.len() + 1);

    let mut terms = Vec::new();
    let mut sort_columns = Vec::with_capacity(criteria.len());
    for criterion in &criteria {
        let column = column_of(record, criterion)?;
        let operand = criterion.order_operand()?;
        if let Some(bound) = criterion.bound_limit()? {
            terms.push(format!("`{}`{}?", column, operand));
            params.push(bound);
        }
        sort_columns.push(format!("`{}`", column));
    }

    if !terms.is_empty() {
        text.push_str(" WHERE ");
        text.push_str(&terms.join(" AND "));
    }
    if let Some(direction) = direction(&criteria)? {
        text.push_str(" ORDER BY ");
        text.push_str(&sort_columns.join(","));
        text.push(' ');
        text.push_str(direction);
    }
    text.push_str(" LIMIT ?");
    params.push(SqlValue::Int(i64::try_from(limit).unwrap_or(i64::MAX)));

    let param_count = params.len().to_string();
    log_event(
        Event::QueryRendered,
        &[("params", &param_count), ("statement", &text)],
    );

    Ok(Statement { text, params })
}

fn column_of(record: &RecordSchema, criterion: &Criterion) -> CriterionResult<String> {
    record
        .field(&criterion.field)
        .map(|f| escape(f.sql_name()))
        .ok_or_else(|| CriterionError::unknown_field(&criterion.field))
}

/// Single sort direction shared by all criteria, `None` without criteria
fn direction(criteria: &[Criterion]) -> CriterionResult<Option<&'static str>> {
    let Some(first) = criteria.first() else {
        return Ok(None);
    };
    let sort = first.order_sort()?;
    for criterion in &criteria[1..] {
        if criterion.order_sort()? != sort {
            return Err(CriterionError::MixedOrder(format!(
                "'{}' is {} but '{}' is {}",
                first.field,
                first.effective_order().name(),
                criterion.field,
                criterion.effective_order().name()
            )));
        }
    }
    Ok(Some(sort))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DerivedPrimitive, FieldSchema, Order, Primitive, TimestampRepr};

    fn schema() -> Schema {
        Schema::Record(
            RecordSchema::new(
                "orders",
                vec![
                    FieldSchema::new("id", Primitive::Int.into()),
                    FieldSchema::new(
                        "placed_at",
                        DerivedPrimitive::timestamp(TimestampRepr::WallClock).into(),
                    ),
                    FieldSchema::new("note", Primitive::String.into()),
                ],
            )
            .unwrap()
            .with_namespace("shop"),
        )
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain_name"), "plain_name");
        assert_eq!(escape("a`b"), "a\\`b");
        assert_eq!(escape("x'); drop *\\"), r"x\')\; drop \*\\");
        assert_eq!(escape("f(x)"), r"f\(x)");
    }

    #[test]
    fn test_first_page_has_no_where() {
        let stmt = render_query("shop", &schema(), 10, &[Criterion::ascending("id")]).unwrap();
        assert_eq!(
            stmt.text,
            "SELECT `id`,`placed_at`,`note` FROM `shop`.`orders` ORDER BY `id` ASC LIMIT ?"
        );
        assert_eq!(stmt.params, vec![SqlValue::Int(10)]);
    }

    #[test]
    fn test_limits_become_placeholders() {
        let criteria = vec![
            Criterion::ascending("id").with_limit(41),
            Criterion::ascending("placed_at").with_limit("2021-01-02T03:04:05Z"),
        ];
        let stmt = render_query("shop", &schema(), 2, &criteria).unwrap();
        assert_eq!(
            stmt.text,
            "SELECT `id`,`placed_at`,`note` FROM `shop`.`orders` \
             WHERE `id`>=? AND `placed_at`>=? ORDER BY `id`,`placed_at` ASC LIMIT ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlValue::Int(41),
                SqlValue::from("2021-01-02 03:04:05"),
                SqlValue::Int(2)
            ]
        );
        assert!(!stmt.text.contains("41"));
    }

    #[test]
    fn test_descending() {
        let criteria = vec![Criterion::descending("note").with_limit("m")];
        let stmt = render_query("shop", &schema(), 5, &criteria).unwrap();
        assert!(stmt.text.contains("WHERE `note`<=? ORDER BY `note` DESC LIMIT ?"));
    }

    #[test]
    fn test_no_criteria() {
        let stmt = render_query("shop", &schema(), 5, &[]).unwrap();
        assert_eq!(
            stmt.text,
            "SELECT `id`,`placed_at`,`note` FROM `shop`.`orders` LIMIT ?"
        );
    }

    #[test]
    fn test_aliases_name_the_columns() {
        let record = RecordSchema::new(
            "orderitems",
            vec![FieldSchema::new("firstname", Primitive::String.into())
                .with_aliases(vec!["first`name".to_string()])],
        )
        .unwrap()
        .with_aliases(vec!["order-items".to_string()]);
        let stmt = render_query(
            "shop",
            &Schema::Record(record),
            1,
            &[Criterion::ascending("firstname").with_limit("a")],
        )
        .unwrap();
        assert_eq!(
            stmt.text,
            "SELECT `first\\`name` FROM `shop`.`order-items` \
             WHERE `first\\`name`>=? ORDER BY `first\\`name` ASC LIMIT ?"
        );
    }

    #[test]
    fn test_rejections() {
        let err = render_query("shop", &Primitive::Int.into(), 1, &[]).unwrap_err();
        assert_eq!(err.code(), "EXPECT_RECORD_SCHEMA");

        let empty = Schema::Record(RecordSchema::new("t", vec![]).unwrap());
        let err = render_query("shop", &empty, 1, &[]).unwrap_err();
        assert_eq!(err.code(), "EXPECT_RECORD_SCHEMA");

        let ignore = vec![Criterion::ascending("id").with_order(Order::Ignore)];
        let err = render_query("shop", &schema(), 1, &ignore).unwrap_err();
        assert_eq!(err, CriterionError::CannotIgnoreOrder);

        let mixed = vec![Criterion::ascending("id"), Criterion::descending("note")];
        let err = render_query("shop", &schema(), 1, &mixed).unwrap_err();
        assert_eq!(err.code(), "MIXED_CRITERION_ORDER");

        let bad_limit = vec![Criterion::ascending("id").with_limit("ten")];
        let err = render_query("shop", &schema(), 1, &bad_limit).unwrap_err();
        assert_eq!(err.code(), "INVALID_CRITERION_LIMIT");
    }
}
