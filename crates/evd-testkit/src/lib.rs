//! evd-testkit
//!
//! Shared helpers for cross-crate scenario tests: submission builders
//! and roster fixtures. The scenarios themselves live under `tests/`.

use anyhow::{Context, Result};
use evd_roster::RosterStore;
use evd_schemas::SubmissionEnvelope;
use serde_json::{json, Value};
use std::path::Path;

/// Build a submission envelope from (question title, answer) pairs.
/// Answers are wrapped in one-element arrays, the shape the forms host
/// actually delivers.
pub fn submission(pairs: &[(&str, &str)]) -> SubmissionEnvelope {
    let mut map = serde_json::Map::new();
    for (title, answer) in pairs {
        map.insert(title.to_string(), json!([answer]));
    }
    SubmissionEnvelope::new(Value::Object(map))
}

/// Write a roster CSV fixture with arbitrary headers and rows.
pub fn write_roster_csv(path: &Path, headers: &[&str], rows: &[&[&str]]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("write roster fixture: {}", path.display()))?;
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(*row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Cell value at (row, field name), resolved through the schema.
pub fn cell(store: &dyn RosterStore, row: usize, field: &str) -> Result<String> {
    let idx = store
        .schema()
        .field_index(field)
        .with_context(|| format!("no such field: {field}"))?;
    let cells = store.read_row(evd_roster::RowHandle(row))?;
    Ok(cells[idx].clone())
}
