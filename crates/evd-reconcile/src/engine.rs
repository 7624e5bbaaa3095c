use crate::{known_field_value, ReconcileAction, ReconcileError, ReconcileReport};
use evd_roster::{RosterStore, FIELD_EMAIL};
use evd_schemas::IncomingContact;

/// Merge one contact into the roster, keyed by email.
///
/// Resolves column positions from the header, scans for a matching
/// email, then either merges into the matched row (preserving columns
/// this engine does not own) or appends a new one. Exactly one row is
/// written on success; a failed call writes nothing. Repeated calls
/// with identical input converge to the same single row.
///
/// Matching is an exact, case-sensitive comparison against the Email
/// column, first row wins. An empty email never matches anything and
/// therefore always inserts (documented duplicate-blank-key edge case).
pub fn reconcile(
    store: &mut dyn RosterStore,
    contact: &IncomingContact,
) -> Result<ReconcileReport, ReconcileError> {
    // Column positions come from header-name lookup because operators
    // reorder columns freely. The schema also carries any configured
    // column-name overrides (Role hosted as "Position" and the like),
    // so lookups here are always by canonical name.
    let schema = store.schema().clone();
    let missing = schema.missing_required();
    if !missing.is_empty() {
        return Err(ReconcileError::MissingRequiredFields { missing });
    }

    // The guard above proves Email exists.
    let email_idx = schema
        .field_index(FIELD_EMAIL)
        .ok_or_else(|| ReconcileError::Storage {
            detail: "Email column vanished after validation".to_string(),
        })?;

    let email_key = contact.email_key().to_string();

    // Linear scan in row order, first exact match wins. O(n) per call
    // with no index; fine at roster scale.
    let matched = if email_key.is_empty() {
        None
    } else {
        store.find_by_field(email_idx, &email_key)
    };

    let fields: Vec<String> = schema.fields().to_vec();
    let mut written_fields = Vec::new();
    let mut preserved_fields = Vec::new();

    match matched {
        Some(handle) => {
            // Read-before-write so columns this engine does not own
            // (Assigned Tasks and friends) survive the merge.
            let current = store
                .read_row(handle)
                .map_err(|e| ReconcileError::Storage { detail: e.to_string() })?;

            let mut cells = Vec::with_capacity(fields.len());
            for (idx, field) in fields.iter().enumerate() {
                match known_field_value(schema.canonical_name(field), contact) {
                    Some(v) => {
                        written_fields.push(field.clone());
                        cells.push(v);
                    }
                    None => {
                        preserved_fields.push(field.clone());
                        cells.push(current.get(idx).cloned().unwrap_or_default());
                    }
                }
            }

            store
                .write_row(handle, cells)
                .map_err(|e| ReconcileError::Storage { detail: e.to_string() })?;

            Ok(ReconcileReport {
                action: ReconcileAction::Updated,
                row: handle.0,
                email_key,
                written_fields,
                preserved_fields,
            })
        }
        None => {
            // New row: known columns from the contact, everything else
            // an empty cell (no prior value to preserve).
            let mut cells = Vec::with_capacity(fields.len());
            for field in &fields {
                match known_field_value(schema.canonical_name(field), contact) {
                    Some(v) => {
                        written_fields.push(field.clone());
                        cells.push(v);
                    }
                    None => {
                        preserved_fields.push(field.clone());
                        cells.push(String::new());
                    }
                }
            }

            let handle = store
                .append_row(cells)
                .map_err(|e| ReconcileError::Storage { detail: e.to_string() })?;

            Ok(ReconcileReport {
                action: ReconcileAction::Inserted,
                row: handle.0,
                email_key,
                written_fields,
                preserved_fields,
            })
        }
    }
}
