use crate::{RosterSchema, RosterStore, RowHandle};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// In-memory roster. Backs unit and scenario tests; also useful as a
/// scratch store for dry runs.
#[derive(Debug, Clone)]
pub struct MemoryRoster {
    schema: RosterSchema,
    rows: Vec<Vec<String>>,
}

impl MemoryRoster {
    pub fn new(schema: RosterSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Roster with the canonical header set and no rows.
    pub fn canonical() -> Self {
        Self::new(RosterSchema::canonical())
    }

    /// Convenience for tests: header names plus pre-seeded rows.
    pub fn with_rows(headers: &[&str], rows: Vec<Vec<&str>>) -> Self {
        let schema = RosterSchema::new(headers.iter().map(|s| s.to_string()).collect());
        let width = schema.width();
        let rows = rows
            .into_iter()
            .map(|r| {
                let mut cells: Vec<String> = r.into_iter().map(|c| c.to_string()).collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();
        Self { schema, rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Install canonical-name -> actual-header overrides on the schema.
    pub fn set_column_names(&mut self, map: BTreeMap<String, String>) {
        self.schema.set_column_names(map);
    }
}

impl RosterStore for MemoryRoster {
    fn schema(&self) -> &RosterSchema {
        &self.schema
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn find_by_field(&self, field_idx: usize, value: &str) -> Option<RowHandle> {
        self.rows
            .iter()
            .position(|r| r.get(field_idx).map(|c| c.as_str()) == Some(value))
            .map(RowHandle)
    }

    fn read_row(&self, handle: RowHandle) -> Result<Vec<String>> {
        let row = self
            .rows
            .get(handle.0)
            .ok_or_else(|| anyhow!("row {} out of range (rows={})", handle.0, self.rows.len()))?;
        let mut cells = row.clone();
        cells.resize(self.schema.width(), String::new());
        Ok(cells)
    }

    fn write_row(&mut self, handle: RowHandle, cells: Vec<String>) -> Result<()> {
        if cells.len() != self.schema.width() {
            return Err(anyhow!(
                "row width {} does not match schema width {}",
                cells.len(),
                self.schema.width()
            ));
        }
        let row = self
            .rows
            .get_mut(handle.0)
            .ok_or_else(|| anyhow!("row {} out of range", handle.0))?;
        *row = cells;
        Ok(())
    }

    fn append_row(&mut self, cells: Vec<String>) -> Result<RowHandle> {
        if cells.len() != self.schema.width() {
            return Err(anyhow!(
                "row width {} does not match schema width {}",
                cells.len(),
                self.schema.width()
            ));
        }
        self.rows.push(cells);
        Ok(RowHandle(self.rows.len() - 1))
    }
}
