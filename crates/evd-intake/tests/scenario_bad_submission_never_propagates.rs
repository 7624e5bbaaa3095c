use evd_audit::IntakeLogWriter;
use evd_intake::{handle_submission, TitleOverrides};
use evd_roster::{MemoryRoster, RosterStore};
use evd_schemas::SubmissionEnvelope;
use serde_json::json;

/// A malformed submission and a misconfigured roster both end as log
/// records, never as panics or errors, and the next submission still
/// lands.
#[test]
fn scenario_bad_submission_never_propagates() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("intake.jsonl");
    let mut log = IntakeLogWriter::new(&log_path, true)?;
    let overrides = TitleOverrides::new();

    // 1. Payload is not an object: extraction fails, call returns.
    let mut roster = MemoryRoster::canonical();
    let bad = SubmissionEnvelope::new(json!("not an object"));
    handle_submission(&mut roster, &bad, &overrides, Some(&mut log));
    assert_eq!(roster.row_count(), 0);

    // 2. Roster missing Email column: reconcile fails, zero writes.
    let mut broken = MemoryRoster::with_rows(&["Name", "Category"], vec![]);
    let ok_payload = SubmissionEnvelope::new(json!({
        "Name": "Ana",
        "Email": "ana@x.com",
        "Category": "Volunteer",
    }));
    handle_submission(&mut broken, &ok_payload, &overrides, Some(&mut log));
    assert_eq!(broken.row_count(), 0);

    // 3. The same payload against a healthy roster still goes through.
    handle_submission(&mut roster, &ok_payload, &overrides, Some(&mut log));
    assert_eq!(roster.row_count(), 1);

    // All three outcomes were recorded, in order.
    let content = std::fs::read_to_string(&log_path)?;
    let outcomes: Vec<String> = content
        .lines()
        .map(|l| {
            let ev: serde_json::Value = serde_json::from_str(l).unwrap();
            ev["outcome"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(outcomes, vec!["ExtractionFailed", "ReconcileFailed", "RosterInserted"]);

    Ok(())
}
