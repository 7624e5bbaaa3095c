use evd_reconcile::*;
use evd_roster::{MemoryRoster, RosterStore};
use evd_schemas::IncomingContact;

#[test]
fn scenario_assigned_tasks_preserved_on_merge() {
    let mut roster = MemoryRoster::with_rows(
        &["Name", "Category", "Role", "Status", "Email", "Phone", "Assigned Tasks"],
        vec![vec!["Ana", "Volunteer", "", "", "ana@x.com", "111", "Setup, Teardown"]],
    );

    let contact = IncomingContact {
        name: Some("Ana B. Lee".to_string()),
        email: Some("ana@x.com".to_string()),
        phone: Some("222".to_string()),
        category: Some("Volunteer".to_string()),
        ..Default::default()
    };

    let report = reconcile(&mut roster, &contact).unwrap();
    assert!(report.is_update());
    assert!(report.preserved_fields.contains(&"Assigned Tasks".to_string()));

    let tasks_idx = roster.schema().field_index("Assigned Tasks").unwrap();
    let name_idx = roster.schema().field_index("Name").unwrap();
    let phone_idx = roster.schema().field_index("Phone").unwrap();
    let row = &roster.rows()[0];
    assert_eq!(row[name_idx], "Ana B. Lee");
    assert_eq!(row[phone_idx], "222");
    assert_eq!(row[tasks_idx], "Setup, Teardown");
}
