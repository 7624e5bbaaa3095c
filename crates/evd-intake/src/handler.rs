use crate::{contact_from_named_values, TitleOverrides};
use evd_audit::{IntakeLogWriter, IntakeOutcome};
use evd_reconcile::{reconcile, ReconcileAction};
use evd_roster::RosterStore;
use evd_schemas::SubmissionEnvelope;
use serde_json::json;
use tracing::{error, info};

/// Run one submission through extraction + reconciliation.
///
/// Never returns an error: every failure is logged (and recorded in the
/// intake log when one is configured) and then swallowed, so the caller
/// can move on to the next submission unconditionally. The host already
/// showed the submitter its generic confirmation; there is no one to
/// report to but the log.
pub fn handle_submission(
    store: &mut dyn RosterStore,
    envelope: &SubmissionEnvelope,
    overrides: &TitleOverrides,
    mut log: Option<&mut IntakeLogWriter>,
) {
    let submission_id = envelope.submission_id;

    let contact = match contact_from_named_values(&envelope.named_values, overrides) {
        Ok(c) => c,
        Err(e) => {
            error!(%submission_id, error = %e, "submission extraction failed");
            record(
                &mut log,
                submission_id,
                IntakeOutcome::ExtractionFailed,
                "",
                json!({ "error": e.to_string() }),
            );
            return;
        }
    };

    let email_key = contact.email_key().to_string();

    match reconcile(store, &contact) {
        Ok(report) => {
            info!(
                %submission_id,
                email_key = %report.email_key,
                action = ?report.action,
                row = report.row,
                "submission reconciled"
            );
            let outcome = match report.action {
                ReconcileAction::Inserted => IntakeOutcome::RosterInserted,
                ReconcileAction::Updated => IntakeOutcome::RosterUpdated,
            };
            let detail = serde_json::to_value(&report).unwrap_or(json!({}));
            record(&mut log, submission_id, outcome, &email_key, detail);
        }
        Err(e) => {
            error!(%submission_id, email_key = %email_key, error = %e, "reconcile failed");
            record(
                &mut log,
                submission_id,
                IntakeOutcome::ReconcileFailed,
                &email_key,
                json!({ "error": e.to_string() }),
            );
        }
    }
}

/// Best-effort intake-log append. A log write failure must not take the
/// submission pipeline down with it.
fn record(
    log: &mut Option<&mut IntakeLogWriter>,
    submission_id: uuid::Uuid,
    outcome: IntakeOutcome,
    email_key: &str,
    detail: serde_json::Value,
) {
    if let Some(w) = log.as_deref_mut() {
        if let Err(e) = w.append(submission_id, outcome, email_key, detail) {
            error!(%submission_id, outcome = outcome.as_str(), error = %e, "intake log append failed");
        }
    }
}
