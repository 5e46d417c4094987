//! Per-run result snapshots: the full response as JSON and the draft as text.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use lexbrief_agent::AgentResponse;

pub struct Snapshot {
    pub json: PathBuf,
    pub text: PathBuf,
}

/// Write `result_<YYYYmmdd_HHMMSS>.json` and `.txt` into `dir`, creating it
/// if needed.
pub fn write_snapshot(
    dir: &Path,
    resp: &AgentResponse,
    at: DateTime<Utc>,
) -> anyhow::Result<Snapshot> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let stem = format!("result_{}", at.format("%Y%m%d_%H%M%S"));
    let json = dir.join(format!("{stem}.json"));
    let text = dir.join(format!("{stem}.txt"));

    let body = serde_json::to_string_pretty(resp).context("serializing response")?;
    std::fs::write(&json, body).with_context(|| format!("writing {}", json.display()))?;
    std::fs::write(&text, &resp.draft).with_context(|| format!("writing {}", text.display()))?;

    Ok(Snapshot { json, text })
}
