//! evd-reconcile
//!
//! Roster reconciliation engine.
//!
//! Architectural decisions:
//! - Email is the identity key; matching is exact and case-sensitive
//! - First matching row wins; no match means append
//! - Columns the engine does not own are copied forward verbatim
//! - Missing required columns abort the call before any write
//! - At most one row is written per call
//!
//! Deterministic, pure logic over the `RosterStore` seam. No IO.

mod engine;
mod types;

pub use engine::reconcile;
pub use types::*;
