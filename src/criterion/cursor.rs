//! Cursor advancement

use super::criterion::Criterion;
use super::errors::{CriterionError, CriterionResult};
use crate::codec::{encode_limit, CodecError, SqlValue};
use crate::observability::{log_event, Event};
use crate::schema::RecordSchema;

/// Derives the next page's criteria from the last fetched row.
///
/// Each criterion that carried a limit gets the limit encoding of its
/// field's value in `last_row` (cells in record field order). Criteria
/// without a limit are dropped.
///
/// # Errors
///
/// - `UnknownField` if a criterion no longer matches a field
/// - codec errors from limit encoding, including a null boundary value
pub fn advance_cursor(
    record: &RecordSchema,
    last_row: &[SqlValue],
    criteria: &[Criterion],
) -> CriterionResult<Vec<Criterion>> {
    if last_row.len() != record.fields().len() {
        return Err(CodecError::invalid_value(format!(
            "row has {} cells, record has {} fields",
            last_row.len(),
            record.fields().len()
        ))
        .into());
    }

    let mut next = Vec::with_capacity(criteria.len());
    for criterion in criteria.iter().filter(|c| c.has_limit()) {
        let index = record
            .field_index(&criterion.field)
            .ok_or_else(|| CriterionError::unknown_field(&criterion.field))?;
        let field = &record.fields()[index];
        let limit = encode_limit(&field.schema, last_row[index].clone())?;

        let mut advanced = Criterion::ascending(criterion.field.clone()).with_limit(limit);
        advanced.order = criterion.order;
        next.push(advanced);
    }

    let count = next.len().to_string();
    log_event(Event::CursorAdvanced, &[("criteria", &count)]);
    Ok(next)
}
