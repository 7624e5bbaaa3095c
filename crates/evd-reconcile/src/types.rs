use evd_roster::{
    FIELD_CATEGORY, FIELD_EMAIL, FIELD_NAME, FIELD_PHONE, FIELD_ROLE, FIELD_STATUS,
};
use evd_schemas::IncomingContact;
use serde::{Deserialize, Serialize};

/// Columns the engine knows how to populate, paired with the contact
/// field each one is filled from. Every other roster column (Assigned
/// Tasks, Notes, operator-added columns) is preserved on update and
/// empty on insert.
pub const KNOWN_FIELDS: &[&str] = &[
    FIELD_NAME,
    FIELD_CATEGORY,
    FIELD_ROLE,
    FIELD_STATUS,
    FIELD_EMAIL,
    FIELD_PHONE,
];

/// Value the engine writes into a known column. Absent contact fields
/// normalize to an empty cell.
pub fn known_field_value(field: &str, contact: &IncomingContact) -> Option<String> {
    let v = match field {
        FIELD_NAME => contact.name.as_deref(),
        FIELD_CATEGORY => contact.category.as_deref(),
        FIELD_ROLE => contact.role.as_deref(),
        FIELD_STATUS => contact.status.as_deref(),
        FIELD_EMAIL => contact.email.as_deref(),
        FIELD_PHONE => contact.phone.as_deref(),
        _ => return None,
    };
    Some(v.unwrap_or("").to_string())
}

/// What the engine did to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileAction {
    /// An existing row with the same email was merged in place.
    Updated,
    /// No row carried the email; a new row was appended.
    Inserted,
}

/// Evidence of one successful reconciliation. Serialized into the
/// intake log, so field lists are kept in deterministic schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub action: ReconcileAction,
    /// 0-based data row index that was written.
    pub row: usize,
    /// Identity key the match ran on ("" when the submission had none).
    pub email_key: String,
    /// Columns written from the contact, in schema order.
    pub written_fields: Vec<String>,
    /// Columns copied forward unchanged (update) or defaulted to ""
    /// (insert), in schema order.
    pub preserved_fields: Vec<String>,
}

impl ReconcileReport {
    pub fn is_insert(&self) -> bool {
        self.action == ReconcileAction::Inserted
    }

    pub fn is_update(&self) -> bool {
        self.action == ReconcileAction::Updated
    }
}

/// Why a reconciliation aborted. Configuration problems are the only
/// way to fail before the write; storage problems the only way after
/// validation. Callers at the intake boundary log and discard these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileError {
    /// The roster header is missing required columns. Nothing written.
    MissingRequiredFields { missing: Vec<String> },
    /// The backing store rejected a read or write.
    Storage { detail: String },
}

impl std::fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::MissingRequiredFields { missing } => {
                write!(f, "roster is missing required column(s): {}", missing.join(", "))
            }
            ReconcileError::Storage { detail } => write!(f, "roster storage error: {detail}"),
        }
    }
}

impl std::error::Error for ReconcileError {}
