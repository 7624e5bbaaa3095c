use anyhow::{Context, Result};
use evd_audit::{IntakeLogWriter, VerifyResult};
use evd_config::EventDeskConfig;
use evd_intake::{handle_submission, TitleOverrides};
use evd_roster::{CsvRoster, RosterStore};
use evd_schemas::SubmissionEnvelope;
use serde_json::Value;
use std::fs;

pub fn submit(
    roster: Option<String>,
    payload: Option<String>,
    payload_file: Option<String>,
    log: Option<String>,
    config_paths: Vec<String>,
) -> Result<()> {
    let cfg = if config_paths.is_empty() {
        None
    } else {
        let refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
        let loaded = evd_config::load_layered_yaml(&refs)?;
        Some(EventDeskConfig::from_json(&loaded.config_json))
    };

    // Flag wins over config, config over environment.
    let roster_path = match roster.or_else(|| cfg.as_ref().and_then(|c| c.roster_path.clone())) {
        Some(p) => p,
        None => super::resolve_roster_path(None)?,
    };
    let log_path = log.or_else(|| cfg.as_ref().and_then(|c| c.intake_log_path.clone()));
    let hash_chain = cfg.as_ref().map(|c| c.intake_log_hash_chain).unwrap_or(true);
    let column_names = cfg.as_ref().map(|c| c.column_names.clone()).unwrap_or_default();
    let overrides: TitleOverrides = cfg.map(|c| c.question_titles).unwrap_or_default();

    let named_values = load_payload(payload, payload_file)?;
    let envelope = SubmissionEnvelope::new(named_values);

    let mut store = CsvRoster::open(&roster_path)?;
    store.set_column_names(column_names);
    let rows_before = store.row_count();

    let mut writer = match &log_path {
        Some(p) => Some(IntakeLogWriter::resume(p, hash_chain)?),
        None => None,
    };

    handle_submission(&mut store, &envelope, &overrides, writer.as_mut());

    println!("submission_id={}", envelope.submission_id);
    println!("roster={}", roster_path);
    println!("rows_before={} rows_after={}", rows_before, store.row_count());
    if let Some(p) = log_path {
        println!("intake_log={}", p);
    }
    Ok(())
}

pub fn verify_log(path: &str) -> Result<()> {
    match evd_audit::verify_hash_chain(path)? {
        VerifyResult::Valid { lines } => {
            println!("chain_valid=true lines={lines}");
            Ok(())
        }
        VerifyResult::Broken { line, reason } => {
            anyhow::bail!("chain_valid=false line={line} reason={reason}")
        }
    }
}

fn load_payload(payload: Option<String>, payload_file: Option<String>) -> Result<Value> {
    if let Some(p) = payload_file {
        // Read raw bytes to handle UTF-8 BOM cleanly on Windows.
        let bytes = fs::read(&p).with_context(|| format!("read payload-file failed: {}", p))?;
        let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);

        let raw = String::from_utf8(bytes.to_vec()).context("payload-file must be UTF-8 text")?;
        let v: Value =
            serde_json::from_str(raw.trim()).context("payload-file must contain valid JSON")?;
        return Ok(v);
    }

    let raw = payload.context("must provide --payload or --payload-file")?;
    let v: Value = serde_json::from_str(raw.trim()).context("--payload must be valid JSON")?;
    Ok(v)
}
