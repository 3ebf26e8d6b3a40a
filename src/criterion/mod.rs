//! Keyset pagination
//!
//! A scan over one table is a loop of three steps:
//! 1. `render_query` builds the page statement from the record and the
//!    current criteria
//! 2. the row source runs it
//! 3. `advance_cursor` derives the next criteria from the page's last row
//!
//! `Pager` drives that loop synchronously. Criteria serialize as the cursor
//! wire form, so a scan can stop and resume in another process.

mod criterion;
mod cursor;
mod errors;
mod pager;
mod render;
mod types;

pub use criterion::{ensure_types, Criterion};
pub use cursor::advance_cursor;
pub use errors::{CriterionError, CriterionResult};
pub use pager::{FetchResult, Page, Pager, RowSource};
pub use render::{escape, expect_record, render_query, Statement};
pub use types::CriterionType;
