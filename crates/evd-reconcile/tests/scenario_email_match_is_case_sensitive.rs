use evd_reconcile::*;
use evd_roster::{MemoryRoster, RosterStore};
use evd_schemas::IncomingContact;

/// Current behavior, pinned deliberately: email identity is compared
/// case-sensitively, so "a@x.com" and "A@X.com" are two people. Possibly
/// a latent bug in the original; kept until intent is clarified.
#[test]
fn scenario_email_match_is_case_sensitive() {
    let mut roster = MemoryRoster::canonical();

    let lower = IncomingContact {
        name: Some("Ada".to_string()),
        email: Some("a@x.com".to_string()),
        ..Default::default()
    };
    let upper = IncomingContact {
        name: Some("Ada".to_string()),
        email: Some("A@X.com".to_string()),
        ..Default::default()
    };

    assert!(reconcile(&mut roster, &lower).unwrap().is_insert());
    assert!(reconcile(&mut roster, &upper).unwrap().is_insert());
    assert_eq!(roster.row_count(), 2);
}
