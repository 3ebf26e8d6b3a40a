//! Synchronous page driver
//!
//! Repeats render, fetch and advance over a `RowSource` until no row is
//! left past the current page. Each fetch asks for one lookahead row beyond
//! the page size.
//!
//! The inclusive `>=`/`<=` comparison brings back every row equal to the
//! cursor boundary. The pager counts how many of those it already emitted
//! (all trailing rows of earlier pages sharing the boundary value), asks
//! for that many extra rows and skips them. A boundary given by the caller
//! is a plain inclusive start and skips nothing. Rows sharing a sort value
//! are told apart only by count, so the order among them is whatever the
//! source returns.

use serde_json::Value;

use super::criterion::Criterion;
use super::cursor::advance_cursor;
use super::errors::{CriterionError, CriterionResult};
use super::render::{expect_record, render_query};
use crate::codec::{EncodedRow, NativeValue, RowCodec, SqlValue};
use crate::observability::{log_event, Event, Logger};
use crate::schema::{RecordSchema, Schema};

/// Rows fetched for one statement, or the driver's error text
pub type FetchResult = Result<Vec<Vec<SqlValue>>, String>;

/// The relational boundary
pub trait RowSource {
    /// Runs `statement` with positional `params` and returns every row, cells
    /// in select-list order.
    fn fetch(&mut self, statement: &str, params: &[SqlValue]) -> FetchResult;
}

impl<F> RowSource for F
where
    F: FnMut(&str, &[SqlValue]) -> FetchResult,
{
    fn fetch(&mut self, statement: &str, params: &[SqlValue]) -> FetchResult {
        self(statement, params)
    }
}

/// One encoded page and the cursor resuming after it
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub rows: Vec<EncodedRow<T>>,
    pub cursor: Vec<Criterion>,
    /// Emitted rows equal to the cursor boundary; pass to [`Pager::resume`]
    pub boundary_rows: usize,
    /// No page follows this one
    pub last: bool,
}

pub struct Pager<'a, S: RowSource + ?Sized> {
    source: &'a mut S,
    db_name: String,
    schema: &'a Schema,
    record: &'a RecordSchema,
    codec: RowCodec<'a>,
    limit: u64,
    cursor: Vec<Criterion>,
    /// Rows equal to the cursor boundary already emitted
    seen_at_boundary: usize,
    pages: u64,
    rows: u64,
    finished: bool,
}

impl<'a, S: RowSource + ?Sized> Pager<'a, S> {
    /// Creates a pager starting at `criteria`.
    ///
    /// # Errors
    ///
    /// - `ExpectRecordSchema` for a non-record or empty record
    /// - `InvalidLimit` for a zero page size
    /// - `UnsupportedTypeForSql` for fields the codec cannot read
    pub fn new(
        source: &'a mut S,
        db_name: impl Into<String>,
        schema: &'a Schema,
        limit: u64,
        criteria: Vec<Criterion>,
    ) -> CriterionResult<Self> {
        let record = expect_record(schema)?;
        if limit == 0 {
            return Err(CriterionError::InvalidLimit("page size must be positive".into()));
        }
        Ok(Self {
            source,
            db_name: db_name.into(),
            schema,
            record,
            codec: RowCodec::new(record)?,
            limit,
            cursor: criteria,
            seen_at_boundary: 0,
            pages: 0,
            rows: 0,
            finished: false,
        })
    }

    /// Creates a pager continuing from a [`Page`]'s cursor and
    /// `boundary_rows`, skipping the boundary rows already emitted.
    pub fn resume(
        source: &'a mut S,
        db_name: impl Into<String>,
        schema: &'a Schema,
        limit: u64,
        cursor: Vec<Criterion>,
        boundary_rows: usize,
    ) -> CriterionResult<Self> {
        let mut pager = Self::new(source, db_name, schema, limit, cursor)?;
        pager.seen_at_boundary = boundary_rows;
        Ok(pager)
    }

    /// Criteria the next page starts from
    pub fn cursor(&self) -> &[Criterion] {
        &self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fetches the next page as native records, `None` once the scan is done
    pub fn next_native_page(&mut self) -> CriterionResult<Option<Page<NativeValue>>> {
        let Some(raw) = self.fetch_raw()? else {
            return Ok(None);
        };
        let rows = raw
            .into_iter()
            .map(|row| self.codec.encode_native_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(self.page(rows)))
    }

    /// Fetches the next page as text rows, `None` once the scan is done
    pub fn next_text_page(&mut self) -> CriterionResult<Option<Page<String>>> {
        let Some(raw) = self.fetch_raw()? else {
            return Ok(None);
        };
        let rows = raw
            .into_iter()
            .map(|row| self.codec.encode_text_row(row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(self.page(rows)))
    }

    fn page<T>(&self, rows: Vec<EncodedRow<T>>) -> Page<T> {
        Page {
            rows,
            cursor: self.cursor.clone(),
            boundary_rows: self.seen_at_boundary,
            last: self.finished,
        }
    }

    /// Runs one fetch and advances the cursor past it
    fn fetch_raw(&mut self) -> CriterionResult<Option<Vec<Vec<SqlValue>>>> {
        if self.finished {
            return Ok(None);
        }

        let boundary = self.boundary(&self.cursor)?;
        let skip = self.seen_at_boundary;
        // One lookahead row plus the boundary rows emitted before
        let request = self.limit.saturating_add(1).saturating_add(skip as u64);
        let statement = render_query(&self.db_name, self.schema, request, &self.cursor)?;
        let mut rows = self
            .source
            .fetch(&statement.text, &statement.params)
            .map_err(CriterionError::Source)?;

        let mut repeated = 0;
        while repeated < skip && repeated < rows.len() {
            if !self.matches_boundary(&rows[repeated], &boundary)? {
                break;
            }
            repeated += 1;
        }
        rows.drain(..repeated);

        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        if rows.len() <= limit {
            self.finished = true;
        }
        rows.truncate(limit);

        self.pages += 1;
        self.rows += rows.len() as u64;
        let page = self.pages.to_string();
        let row_count = rows.len().to_string();
        log_event(
            Event::PageFetched,
            &[
                ("page", &page),
                ("rows", &row_count),
                ("table", self.record.sql_name()),
            ],
        );

        if let Some(last) = rows.last() {
            let next = advance_cursor(self.record, last, &self.cursor)?;
            if !self.finished && next.is_empty() {
                Logger::warn(
                    Event::ScanComplete.as_str(),
                    &[("reason", "no criterion carries a boundary"), ("page", &page)],
                );
                self.finished = true;
            }

            let next_boundary = self.boundary(&next)?;
            let mut trailing = 0;
            if !next_boundary.is_empty() {
                for row in rows.iter().rev() {
                    if !self.matches_boundary(row, &next_boundary)? {
                        break;
                    }
                    trailing += 1;
                }
            }
            // A page made only of boundary rows extends the earlier run
            self.seen_at_boundary = if next_boundary == boundary && trailing == rows.len() {
                skip + trailing
            } else {
                trailing
            };
            self.cursor = next;
        }

        if self.finished {
            let pages = self.pages.to_string();
            let total = self.rows.to_string();
            log_event(Event::ScanComplete, &[("pages", &pages), ("rows", &total)]);
        }
        Ok(Some(rows))
    }

    /// Field positions and limits of criteria that carry a boundary
    fn boundary(&self, criteria: &[Criterion]) -> CriterionResult<Vec<(usize, Value)>> {
        criteria
            .iter()
            .filter_map(|c| c.limit.as_ref().map(|limit| (c, limit)))
            .map(|(c, limit)| {
                self.record
                    .field_index(&c.field)
                    .map(|index| (index, limit.clone()))
                    .ok_or_else(|| CriterionError::unknown_field(&c.field))
            })
            .collect()
    }

    fn matches_boundary(&self, row: &[SqlValue], boundary: &[(usize, Value)]) -> CriterionResult<bool> {
        for (index, limit) in boundary {
            let Some(cell) = row.get(*index) else {
                return Ok(false);
            };
            if cell.is_null() {
                return Ok(false);
            }
            if self.codec.encode_limit_cell(*index, cell.clone())? != *limit {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
