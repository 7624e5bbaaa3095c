use evd_reconcile::*;
use evd_roster::{MemoryRoster, RosterStore};
use evd_schemas::IncomingContact;

/// A submission without an email can never match, so every such call
/// appends another blank-keyed row. Documented edge case, not an error.
#[test]
fn scenario_empty_email_always_inserts() {
    let mut roster = MemoryRoster::canonical();

    let contact = IncomingContact {
        name: Some("Anon".to_string()),
        ..Default::default()
    };

    assert!(reconcile(&mut roster, &contact).unwrap().is_insert());
    assert!(reconcile(&mut roster, &contact).unwrap().is_insert());
    assert_eq!(roster.row_count(), 2);

    // An existing row with an empty Email cell is never treated as a match.
    let email_idx = roster.schema().field_index("Email").unwrap();
    assert_eq!(roster.rows()[0][email_idx], "");
    assert_eq!(roster.rows()[1][email_idx], "");
}
