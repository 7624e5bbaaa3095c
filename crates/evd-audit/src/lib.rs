//! evd-audit
//!
//! Append-only intake log. One JSON line per submission outcome. The
//! reconciler itself is fire-and-forget from the form host's point of
//! view, so this log is the only durable record of what each submission
//! did to the roster.
//!
//! Optional hash chain: each event carries hash_prev + hash_self so a
//! tampered or truncated log is detectable after the fact.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// How one submission ended. `detail` holds the reconcile report (on
/// success) or the error text (on failure), already serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeOutcome {
    RosterInserted,
    RosterUpdated,
    ExtractionFailed,
    ReconcileFailed,
}

impl IntakeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeOutcome::RosterInserted => "ROSTER_INSERTED",
            IntakeOutcome::RosterUpdated => "ROSTER_UPDATED",
            IntakeOutcome::ExtractionFailed => "EXTRACTION_FAILED",
            IntakeOutcome::ReconcileFailed => "RECONCILE_FAILED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeEvent {
    pub event_id: Uuid,
    pub submission_id: Uuid,
    pub ts_utc: DateTime<Utc>,
    pub outcome: IntakeOutcome,
    /// Identity key the reconciler matched on ("" when absent).
    pub email_key: String,
    pub detail: Value,
    pub hash_prev: Option<String>,
    pub hash_self: Option<String>,
}

/// Append-only writer. Create once per process; call `append` per
/// submission. When resuming an existing log, restore chain state with
/// `set_last_hash` + `set_seq`.
pub struct IntakeLogWriter {
    path: PathBuf,
    hash_chain: bool,
    last_hash: Option<String>,
    seq: u64,
}

impl IntakeLogWriter {
    /// Creates the writer and ensures parent dirs exist.
    pub fn new(path: impl AsRef<Path>, hash_chain: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create_dir_all {:?}", parent))?;
            }
        }

        Ok(Self {
            path,
            hash_chain,
            last_hash: None,
            seq: 0,
        })
    }

    /// Open a possibly-existing log and restore chain state from its
    /// last line, so appends continue the chain instead of restarting it.
    pub fn resume(path: impl AsRef<Path>, hash_chain: bool) -> Result<Self> {
        let mut w = Self::new(&path, hash_chain)?;
        if !w.path.exists() {
            return Ok(w);
        }

        let content = fs::read_to_string(&w.path)
            .with_context(|| format!("read intake log {:?}", w.path))?;
        let mut seq = 0u64;
        let mut last_hash = None;
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let ev: IntakeEvent = serde_json::from_str(trimmed)
                .with_context(|| format!("parse intake event while resuming {:?}", w.path))?;
            seq += 1;
            last_hash = ev.hash_self;
        }
        w.set_seq(seq);
        w.set_last_hash(last_hash);
        Ok(w)
    }

    pub fn set_last_hash(&mut self, last_hash: Option<String>) {
        self.last_hash = last_hash;
    }

    /// Set the sequence counter when resuming: pass the number of events
    /// already written.
    pub fn set_seq(&mut self, seq: u64) {
        self.seq = seq;
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Append one event and return it as written.
    pub fn append(
        &mut self,
        submission_id: Uuid,
        outcome: IntakeOutcome,
        email_key: &str,
        detail: Value,
    ) -> Result<IntakeEvent> {
        // event_id is derived from chain state + sequence, not random, so
        // replaying the same log produces the same ids.
        let event_id = derive_event_id(self.last_hash.as_deref(), self.seq);
        self.seq += 1;

        let mut ev = IntakeEvent {
            event_id,
            submission_id,
            ts_utc: Utc::now(),
            outcome,
            email_key: email_key.to_string(),
            detail,
            hash_prev: None,
            hash_self: None,
        };

        if self.hash_chain {
            ev.hash_prev = self.last_hash.clone();
            let self_hash = compute_event_hash(&ev)?;
            ev.hash_self = Some(self_hash.clone());
            self.last_hash = Some(self_hash);
        }

        let line = canonical_json_line(&ev)?;
        append_line(&self.path, &line)?;

        Ok(ev)
    }
}

/// UUIDv5 over chain state + sequence, under a fixed namespace.
fn derive_event_id(last_hash: Option<&str>, seq: u64) -> Uuid {
    // Namespace id for intake-log events; arbitrary but fixed forever.
    const NS: Uuid = Uuid::from_u128(0x7d1f_8a02_9c44_4bd3_a5e6_01ce_52b7_90aa_u128);
    let material = format!("{}|{}", last_hash.unwrap_or("GENESIS"), seq);
    Uuid::new_v5(&NS, material.as_bytes())
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open intake log {:?}", path))?;
    f.write_all(line.as_bytes())
        .context("write intake log line failed")?;
    f.write_all(b"\n").context("write newline failed")?;
    Ok(())
}

/// Canonicalize by sorting keys recursively and emitting compact JSON.
/// One event == one JSON line.
fn canonical_json_line<T: Serialize>(v: &T) -> Result<String> {
    let raw = serde_json::to_value(v).context("serialize intake event failed")?;
    let sorted = sort_keys(&raw);
    serde_json::to_string(&sorted).context("json stringify failed")
}

fn sort_keys(v: &Value) -> Value {
    match v {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut new = serde_json::Map::new();
            for k in keys {
                new.insert(k.clone(), sort_keys(&map[&k]));
            }
            Value::Object(new)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys).collect()),
        _ => v.clone(),
    }
}

/// Event hash excludes hash_self to avoid self-reference.
pub fn compute_event_hash(ev: &IntakeEvent) -> Result<String> {
    let mut clone = ev.clone();
    clone.hash_self = None;

    let canonical = canonical_json_line(&clone)?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Result of hash-chain verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyResult {
    Valid { lines: usize },
    Broken { line: usize, reason: String },
}

/// Verify the hash-chain integrity of an intake log file.
pub fn verify_hash_chain(path: impl AsRef<Path>) -> Result<VerifyResult> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("read intake log {:?}", path.as_ref()))?;
    verify_hash_chain_str(&content)
}

/// Same as [`verify_hash_chain`] over in-memory JSONL content.
pub fn verify_hash_chain_str(content: &str) -> Result<VerifyResult> {
    let mut prev_hash: Option<String> = None;
    let mut line_count = 0usize;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let ev: IntakeEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("parse intake event at line {}", i + 1))?;

        line_count += 1;

        if ev.hash_prev != prev_hash {
            return Ok(VerifyResult::Broken {
                line: i + 1,
                reason: format!(
                    "hash_prev mismatch: expected {:?}, got {:?}",
                    prev_hash, ev.hash_prev
                ),
            });
        }

        if let Some(ref claimed) = ev.hash_self {
            let recomputed = compute_event_hash(&ev)?;
            if *claimed != recomputed {
                return Ok(VerifyResult::Broken {
                    line: i + 1,
                    reason: format!(
                        "hash_self mismatch: claimed {}, recomputed {}",
                        claimed, recomputed
                    ),
                });
            }
        }

        prev_hash = ev.hash_self.clone();
    }

    Ok(VerifyResult::Valid { lines: line_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_ids_are_deterministic_per_chain_position() {
        assert_eq!(derive_event_id(None, 0), derive_event_id(None, 0));
        assert_ne!(derive_event_id(None, 0), derive_event_id(None, 1));
        assert_ne!(derive_event_id(Some("abc"), 1), derive_event_id(Some("abd"), 1));
    }
}
