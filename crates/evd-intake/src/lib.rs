//! evd-intake
//!
//! The form-submission boundary. A submission arrives as a map of
//! question titles to answers; it is normalized into an
//! `IncomingContact` and reconciled into the roster. Nothing here ever
//! propagates an error back to the caller: one malformed submission must
//! not block the next one or trip host-side retry machinery, so failures
//! surface only as log entries and intake-log events.

mod extract;
mod handler;

pub use extract::{contact_from_named_values, TitleOverrides};
pub use handler::handle_submission;
