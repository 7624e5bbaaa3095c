//! evd-config
//!
//! Layered YAML configuration for the event-desk tooling: a base file
//! plus site/venue overrides, merged in order, hashed canonically so an
//! intake log can be tied back to the exact configuration it ran under.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;

/// Known secret-like prefixes. Config files hold paths and column names;
/// credentials belong in the environment, so any leaf string starting
/// with one of these aborts the load.
const SECRET_PREFIXES: &[&str] = &[
    "sk-",        // OpenAI / Stripe style
    "sk_live",    // Stripe live
    "sk_test",    // Stripe test
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "xoxb-",      // Slack bot token
];

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw =
            fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }

    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    // Merge in order: earlier docs are base, later docs override.
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let canonical_json = canonicalize_json(&merged)?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

/// Compact JSON with recursively sorted keys, so the hash does not
/// depend on YAML key ordering across layers.
fn canonicalize_json(v: &Value) -> Result<String> {
    fn sort(v: &Value) -> Value {
        match v {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.iter().map(|(k, vv)| (k.clone(), sort(vv))).collect();
                serde_json::to_value(sorted).unwrap_or(Value::Null)
            }
            Value::Array(arr) => Value::Array(arr.iter().map(sort).collect()),
            _ => v.clone(),
        }
    }
    serde_json::to_string(&sort(v)).context("canonical json serialize failed")
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    let mut leaves = Vec::new();
    collect_leaf_pointers(v, "", &mut leaves);

    for ptr in leaves {
        if let Some(val) = v.pointer(&ptr) {
            if let Some(s) = val.as_str() {
                if looks_like_secret(s) {
                    bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", ptr);
                }
            }
        }
    }
    Ok(())
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map.iter() {
                let next = format!("{}/{}", prefix, escape_pointer_token(k));
                collect_leaf_pointers(vv, &next, out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                let next = format!("{}/{}", prefix, i);
                collect_leaf_pointers(vv, &next, out);
            }
        }
        _ => {
            let p = if prefix.is_empty() {
                "/".to_string()
            } else {
                prefix.to_string()
            };
            out.push(p);
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    if t.len() < 8 {
        return false;
    }
    SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}

/// Typed view over the merged config. Every field has a default so an
/// empty config is valid.
#[derive(Debug, Clone)]
pub struct EventDeskConfig {
    /// Path to the People roster CSV.
    pub roster_path: Option<String>,
    /// Canonical roster column -> actual header, for rosters whose
    /// operator renamed a column, e.g. "Role" -> "Position".
    pub column_names: BTreeMap<String, String>,
    /// Form question title -> contact field name overrides, e.g.
    /// "Your full name" -> "name".
    pub question_titles: BTreeMap<String, String>,
    /// Intake log path. None disables the log.
    pub intake_log_path: Option<String>,
    /// Hash-chain the intake log. Defaults to true when the log is on.
    pub intake_log_hash_chain: bool,
}

impl EventDeskConfig {
    pub fn from_json(v: &Value) -> Self {
        let roster_path = v
            .pointer("/roster/csv_path")
            .and_then(|x| x.as_str())
            .map(|s| s.to_string());

        let mut column_names = BTreeMap::new();
        if let Some(Value::Object(map)) = v.pointer("/roster/column_names") {
            for (canonical, actual) in map {
                if let Some(a) = actual.as_str() {
                    column_names.insert(canonical.clone(), a.to_string());
                }
            }
        }

        let mut question_titles = BTreeMap::new();
        if let Some(Value::Object(map)) = v.pointer("/intake/question_titles") {
            for (title, field) in map {
                if let Some(f) = field.as_str() {
                    question_titles.insert(title.clone(), f.to_string());
                }
            }
        }

        let intake_log_path = v
            .pointer("/intake/log_path")
            .and_then(|x| x.as_str())
            .map(|s| s.to_string());

        let intake_log_hash_chain = v
            .pointer("/intake/log_hash_chain")
            .and_then(|x| x.as_bool())
            .unwrap_or(true);

        Self {
            roster_path,
            column_names,
            question_titles,
            intake_log_path,
            intake_log_hash_chain,
        }
    }
}
