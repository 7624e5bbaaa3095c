use anyhow::Result;
use evd_roster::{CsvRoster, RosterStore};

pub fn init(path: Option<String>) -> Result<()> {
    let path = super::resolve_roster_path(path)?;
    let roster = CsvRoster::init(&path)?;
    println!("roster_created=true path={}", roster.path().display());
    println!("columns={}", roster.schema().fields().join(","));
    Ok(())
}

pub fn show(path: Option<String>) -> Result<()> {
    let path = super::resolve_roster_path(path)?;
    let roster = CsvRoster::open(&path)?;

    println!("path={}", roster.path().display());
    println!("columns={}", roster.schema().fields().join(","));
    println!("rows={}", roster.row_count());
    for (i, row) in roster.rows().iter().enumerate() {
        println!("row_{i}={}", row.join(" | "));
    }
    Ok(())
}
