use crate::{RosterSchema, RosterStore, RowHandle};
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Persisted roster backed by a header-row CSV file — the stand-in for
/// the hosted People sheet.
///
/// Every mutation rewrites the whole file so the on-disk state always
/// matches the in-memory state after `write_row`/`append_row` return.
/// O(n) per write; the roster is tens to low-thousands of rows.
#[derive(Debug)]
pub struct CsvRoster {
    path: PathBuf,
    schema: RosterSchema,
    rows: Vec<Vec<String>>,
}

impl CsvRoster {
    /// Open an existing roster file, reading the schema from row 1.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("open roster csv failed: {}", path.display()))?;

        let headers = rdr
            .headers()
            .with_context(|| format!("read roster header row failed: {}", path.display()))?;
        let schema = RosterSchema::new(headers.iter().map(|h| h.to_string()).collect());
        if schema.width() == 0 {
            return Err(anyhow!("roster has an empty header row: {}", path.display()));
        }

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec.with_context(|| format!("read roster row failed: {}", path.display()))?;
            let mut cells: Vec<String> = rec.iter().map(|c| c.to_string()).collect();
            cells.resize(schema.width(), String::new());
            rows.push(cells);
        }

        Ok(Self { path, schema, rows })
    }

    /// Create a new roster file with the canonical header row and open it.
    /// Refuses to clobber an existing file.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            return Err(anyhow!("roster already exists: {}", path.display()));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create roster dir failed: {}", parent.display()))?;
            }
        }

        let roster = Self {
            path,
            schema: RosterSchema::canonical(),
            rows: Vec::new(),
        };
        roster.persist()?;
        Ok(roster)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Install canonical-name -> actual-header overrides on the schema.
    pub fn set_column_names(&mut self, map: BTreeMap<String, String>) {
        self.schema.set_column_names(map);
    }

    /// Rewrite the backing file. Goes through a sibling temp file and a
    /// rename, so a failure mid-write leaves the live file untouched.
    fn persist(&self) -> Result<()> {
        let mut tmp = self.path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let mut wtr = csv::Writer::from_path(&tmp)
            .with_context(|| format!("write roster csv failed: {}", tmp.display()))?;
        wtr.write_record(self.schema.fields())
            .context("write roster header failed")?;
        for row in &self.rows {
            wtr.write_record(row).context("write roster row failed")?;
        }
        wtr.flush().context("flush roster csv failed")?;
        drop(wtr);

        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace roster csv failed: {}", self.path.display()))?;
        Ok(())
    }

    fn check_width(&self, cells: &[String]) -> Result<()> {
        if cells.len() != self.schema.width() {
            return Err(anyhow!(
                "row width {} does not match schema width {}",
                cells.len(),
                self.schema.width()
            ));
        }
        Ok(())
    }
}

impl RosterStore for CsvRoster {
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
        self.rows
            .get(handle.0)
            .cloned()
            .ok_or_else(|| anyhow!("row {} out of range (rows={})", handle.0, self.rows.len()))
    }

    fn write_row(&mut self, handle: RowHandle, cells: Vec<String>) -> Result<()> {
        self.check_width(&cells)?;
        let row = self
            .rows
            .get_mut(handle.0)
            .ok_or_else(|| anyhow!("row {} out of range", handle.0))?;
        let prev = std::mem::replace(row, cells);
        // Keep memory and disk in step: a failed persist rolls the row
        // back instead of leaving a change that was never written out.
        if let Err(e) = self.persist() {
            self.rows[handle.0] = prev;
            return Err(e);
        }
        Ok(())
    }

    fn append_row(&mut self, cells: Vec<String>) -> Result<RowHandle> {
        self.check_width(&cells)?;
        self.rows.push(cells);
        if let Err(e) = self.persist() {
            self.rows.pop();
            return Err(e);
        }
        Ok(RowHandle(self.rows.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        CsvRoster::init(&path).unwrap();
        assert!(CsvRoster::init(&path).is_err());
    }

    #[test]
    fn appended_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");

        let mut roster = CsvRoster::init(&path).unwrap();
        let width = roster.schema().width();
        let mut cells = vec![String::new(); width];
        cells[roster.schema().field_index("Name").unwrap()] = "Ana".to_string();
        cells[roster.schema().field_index("Email").unwrap()] = "ana@x.com".to_string();
        roster.append_row(cells).unwrap();

        let reopened = CsvRoster::open(&path).unwrap();
        assert_eq!(reopened.row_count(), 1);
        let email = reopened.schema().field_index("Email").unwrap();
        assert_eq!(reopened.find_by_field(email, "ana@x.com"), Some(RowHandle(0)));
    }

    #[test]
    fn failed_persist_rolls_back_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("rosters");
        std::fs::create_dir(&sub).unwrap();
        let mut roster = CsvRoster::init(sub.join("people.csv")).unwrap();

        let mut cells = vec![String::new(); roster.schema().width()];
        cells[roster.schema().field_index("Email").unwrap()] = "ana@x.com".to_string();
        roster.append_row(cells.clone()).unwrap();

        // Remove the backing directory so the next persist cannot land.
        std::fs::remove_dir_all(&sub).unwrap();

        assert!(roster.append_row(cells.clone()).is_err());
        assert_eq!(roster.row_count(), 1);

        cells[roster.schema().field_index("Name").unwrap()] = "Changed".to_string();
        assert!(roster.write_row(RowHandle(0), cells).is_err());
        let name = roster.schema().field_index("Name").unwrap();
        assert_eq!(roster.read_row(RowHandle(0)).unwrap()[name], "");
    }

    #[test]
    fn open_reads_operator_reordered_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "Email,Name,Category\nana@x.com,Ana,Volunteer\n").unwrap();

        let roster = CsvRoster::open(&path).unwrap();
        assert_eq!(roster.schema().field_index("Email"), Some(0));
        assert_eq!(roster.schema().field_index("Category"), Some(2));
        assert_eq!(roster.row_count(), 1);
    }
}
