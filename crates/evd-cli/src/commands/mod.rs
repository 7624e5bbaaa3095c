pub mod intake;
pub mod roster;

use anyhow::{Context, Result};

pub const ENV_ROSTER_PATH: &str = "EVD_ROSTER_PATH";

/// Resolve the roster path: explicit flag, then environment.
pub fn resolve_roster_path(flag: Option<String>) -> Result<String> {
    if let Some(p) = flag {
        return Ok(p);
    }
    std::env::var(ENV_ROSTER_PATH)
        .with_context(|| format!("no --path given and {ENV_ROSTER_PATH} is not set"))
}
