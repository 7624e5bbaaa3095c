use evd_reconcile::*;
use evd_roster::{MemoryRoster, RosterStore};
use evd_schemas::IncomingContact;

#[test]
fn scenario_repeat_submission_is_idempotent() {
    let mut roster = MemoryRoster::canonical();

    let contact = IncomingContact {
        name: Some("Ana Lee".to_string()),
        email: Some("ana@x.com".to_string()),
        category: Some("Volunteer".to_string()),
        ..Default::default()
    };

    let first = reconcile(&mut roster, &contact).unwrap();
    assert_eq!(first.action, ReconcileAction::Inserted);
    let after_first = roster.rows().to_vec();

    let second = reconcile(&mut roster, &contact).unwrap();
    assert_eq!(second.action, ReconcileAction::Updated);
    assert_eq!(second.row, first.row);

    // One row, identical state to a single application.
    assert_eq!(roster.row_count(), 1);
    assert_eq!(roster.rows(), after_first.as_slice());
}
