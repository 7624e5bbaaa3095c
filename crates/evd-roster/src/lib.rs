//! evd-roster
//!
//! Storage layer for the People roster: an ordered tabular store whose
//! first row holds field names. Column positions are discovered by
//! header lookup, never assumed — operators reorder columns freely.
//!
//! Two implementations of the same seam:
//! - `MemoryRoster` for tests and pure-logic callers
//! - `CsvRoster` for the persisted production roster

mod csv_store;
mod memory;
mod schema;

pub use csv_store::CsvRoster;
pub use memory::MemoryRoster;
pub use schema::{
    RosterSchema, FIELD_ASSIGNED_TASKS, FIELD_CATEGORY, FIELD_EMAIL, FIELD_NAME, FIELD_PHONE,
    FIELD_ROLE, FIELD_STATUS, REQUIRED_FIELDS, ROSTER_HEADERS,
};

use anyhow::Result;

/// Stable handle to one data row (0-based, header excluded).
///
/// Handles stay valid for the lifetime of the store because this
/// subsystem never deletes rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowHandle(pub usize);

/// Record-oriented view over the roster's backing store.
///
/// Cell values are plain strings, matching the tabular host this layer
/// stands in for. A row read back always has exactly `schema` width.
pub trait RosterStore {
    /// Ordered field names from the header row.
    fn schema(&self) -> &RosterSchema;

    /// Number of data rows (header excluded).
    fn row_count(&self) -> usize;

    /// First row (in row order) whose cell at `field_idx` equals `value`
    /// exactly. Linear scan; no index is kept at roster scale.
    fn find_by_field(&self, field_idx: usize, value: &str) -> Option<RowHandle>;

    /// Full cell contents of one row, padded/truncated to schema width.
    fn read_row(&self, handle: RowHandle) -> Result<Vec<String>>;

    /// Overwrite one row in place.
    fn write_row(&mut self, handle: RowHandle, cells: Vec<String>) -> Result<()>;

    /// Append a row after the last existing one.
    fn append_row(&mut self, cells: Vec<String>) -> Result<RowHandle>;
}
