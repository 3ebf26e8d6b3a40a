//! Keyset criterion
//!
//! Wire form `{"field": "...", "limit": <scalar>, "order": "..."}`; `limit`
//! and `order` are optional. A list of criteria is the scan cursor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{CriterionError, CriterionResult};
use super::types::CriterionType;
use crate::codec::SqlValue;
use crate::schema::{Order, RecordSchema};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Field name or alias
    pub field: String,
    /// Limit-encoded boundary; absent on the first page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(skip)]
    resolved: Option<CriterionType>,
}

impl Criterion {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            limit: None,
            order: None,
            resolved: None,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::ascending(field).with_order(Order::Descending)
    }

    pub fn with_limit(mut self, limit: impl Into<Value>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }

    /// Order, ascending when omitted
    pub fn effective_order(&self) -> Order {
        self.order.unwrap_or_default()
    }

    /// Type set by [`ensure_types`]
    pub fn resolved_type(&self) -> Option<CriterionType> {
        self.resolved
    }

    /// Comparison operator for the WHERE term
    ///
    /// # Errors
    ///
    /// `CannotIgnoreOrder` for `ignore`.
    pub fn order_operand(&self) -> CriterionResult<&'static str> {
        match self.effective_order() {
            Order::Ascending => Ok(">="),
            Order::Descending => Ok("<="),
            Order::Ignore => Err(CriterionError::CannotIgnoreOrder),
        }
    }

    /// Direction keyword for the ORDER BY clause
    ///
    /// # Errors
    ///
    /// `CannotIgnoreOrder` for `ignore`.
    pub fn order_sort(&self) -> CriterionResult<&'static str> {
        match self.effective_order() {
            Order::Ascending => Ok("ASC"),
            Order::Descending => Ok("DESC"),
            Order::Ignore => Err(CriterionError::CannotIgnoreOrder),
        }
    }

    /// Statement parameter for the limit, `None` without one.
    ///
    /// Unresolved criteria are rejected; run [`ensure_types`] first.
    pub fn bound_limit(&self) -> CriterionResult<Option<SqlValue>> {
        let Some(limit) = &self.limit else {
            return Ok(None);
        };
        let resolved = self.resolved.ok_or_else(|| {
            CriterionError::invalid_limit(&self.field, "criterion type not resolved")
        })?;
        resolved.bind(&self.field, limit).map(Some)
    }
}

/// Resolves every criterion against `record`, by field name or alias, and
/// records its comparison type.
///
/// # Errors
///
/// - `UnknownField` if no field answers to the criterion name
/// - `UnsupportedTypeForCriterion` if the field type is not comparable
pub fn ensure_types(record: &RecordSchema, criteria: &mut [Criterion]) -> CriterionResult<()> {
    for criterion in criteria.iter_mut() {
        let field = record
            .field(&criterion.field)
            .ok_or_else(|| CriterionError::unknown_field(&criterion.field))?;
        criterion.resolved = Some(CriterionType::classify(field)?);
    }
    Ok(())
}
