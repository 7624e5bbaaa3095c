use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized contact produced from one form submission.
///
/// All fields are optional strings; `email` is the identity key the roster
/// is reconciled on. An absent field normalizes to an empty cell when the
/// roster is written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
    /// Free-text notes from the form. Carried into the intake log but not a
    /// roster column the reconciler owns.
    pub notes: Option<String>,
}

impl IncomingContact {
    /// Identity key used for roster matching. Empty string when the
    /// submission carried no email (such a contact always inserts).
    pub fn email_key(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }
}

/// One form submission as received from the forms host, before extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionEnvelope {
    pub submission_id: Uuid,
    pub received_at_utc: DateTime<Utc>,
    /// Question title -> answer. Answers arrive as a string or a
    /// one-element string array depending on the host.
    pub named_values: serde_json::Value,
}

impl SubmissionEnvelope {
    pub fn new(named_values: serde_json::Value) -> Self {
        Self {
            submission_id: Uuid::new_v4(),
            received_at_utc: Utc::now(),
            named_values,
        }
    }
}
