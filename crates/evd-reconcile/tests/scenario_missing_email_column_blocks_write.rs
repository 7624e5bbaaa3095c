use evd_reconcile::*;
use evd_roster::{MemoryRoster, RosterStore};
use evd_schemas::IncomingContact;

#[test]
fn scenario_missing_email_column_blocks_write() {
    let mut roster = MemoryRoster::with_rows(&["Name", "Category", "Phone"], vec![]);

    let contact = IncomingContact {
        name: Some("Ana".to_string()),
        email: Some("ana@x.com".to_string()),
        ..Default::default()
    };

    let err = reconcile(&mut roster, &contact).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::MissingRequiredFields {
            missing: vec!["Email".to_string()]
        }
    );

    // Aborted before any write.
    assert_eq!(roster.row_count(), 0);
}

#[test]
fn scenario_all_missing_columns_are_reported() {
    let mut roster = MemoryRoster::with_rows(&["Phone", "Notes"], vec![]);

    let err = reconcile(&mut roster, &IncomingContact::default()).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::MissingRequiredFields {
            missing: vec!["Name".to_string(), "Category".to_string(), "Email".to_string()]
        }
    );
    assert_eq!(roster.row_count(), 0);
}
