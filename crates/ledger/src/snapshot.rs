// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime snapshot: the materialized answer to "what is running now".
//!
//! Snapshot writes replace the whole file via write-temp-then-rename, so a
//! concurrent reader sees either the old or the new content, never a
//! partial one. The revision counter strictly increments on every write.

use crate::journal::Journal;
use crate::reduce::{reduce_events, ActiveRun};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const SOURCE_MATERIALIZED_LEDGER: &str = "materialized-ledger";
pub const SOURCE_LIVE_RECONCILER: &str = "live-reconciler";

/// Freshness window applied when no explicit `--stale-ms` is given.
pub const DEFAULT_STALE_MS: u64 = 10 * 60 * 1000;

const REVISION_PREFIX: &str = "rtv1-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeStatus {
    Running,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotMode {
    Live,
    FallbackSanitized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
    pub status: RuntimeStatus,
    pub is_idle: bool,
    pub active_count: usize,
    pub active_runs: Vec<ActiveRun>,
    pub checked_at_ms: u64,
    pub source: String,
    pub revision: String,
    pub snapshot_mode: SnapshotMode,
    pub degraded_reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materialized_at_ms: Option<u64>,
    #[serde(default)]
    pub terminal_count: usize,
    #[serde(default)]
    pub dropped_stale_count: usize,
}

impl RuntimeSnapshot {
    /// Recompute status fields after the active set changed.
    pub fn refresh_status(&mut self) {
        self.active_count = self.active_runs.len();
        self.is_idle = self.active_runs.is_empty();
        self.status = if self.is_idle {
            RuntimeStatus::Idle
        } else {
            RuntimeStatus::Running
        };
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Parse `rtv1-<digits>` into the counter value.
pub fn parse_revision(revision: &str) -> Option<u64> {
    let digits = revision.strip_prefix(REVISION_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Render a counter as `rtv1-<8-digit zero-padded>`.
pub fn format_revision(counter: u64) -> String {
    format!("{REVISION_PREFIX}{counter:08}")
}

/// Read the prior snapshot's revision counter; missing or unreadable
/// priors read as zero.
pub fn read_revision_number(snapshot_file: &Path) -> u64 {
    let Ok(text) = fs::read_to_string(snapshot_file) else {
        return 0;
    };
    let Ok(value) = serde_json::from_str::<Value>(&text) else {
        return 0;
    };
    value
        .get("revision")
        .and_then(Value::as_str)
        .and_then(parse_revision)
        .unwrap_or(0)
}

/// Replay the journal and replace the snapshot file.
pub fn materialize(
    events_file: &Path,
    snapshot_file: &Path,
    now_ms: u64,
    stale_ms: u64,
) -> Result<RuntimeSnapshot, SnapshotError> {
    let events = Journal::new(events_file).read_events();
    let reduction = reduce_events(&events, now_ms, stale_ms);
    let revision = format_revision(read_revision_number(snapshot_file) + 1);

    let mut snapshot = RuntimeSnapshot {
        status: RuntimeStatus::Idle,
        is_idle: true,
        active_count: 0,
        active_runs: reduction.active_rows,
        checked_at_ms: now_ms,
        source: SOURCE_MATERIALIZED_LEDGER.to_string(),
        revision,
        snapshot_mode: SnapshotMode::Live,
        degraded_reason: String::new(),
        materialized_at_ms: Some(now_ms),
        terminal_count: reduction.terminals.len(),
        dropped_stale_count: reduction.dropped_stale,
    };
    snapshot.refresh_status();

    write_snapshot(snapshot_file, &snapshot)?;
    debug!(
        revision = %snapshot.revision,
        active = snapshot.active_count,
        terminals = snapshot.terminal_count,
        "runtime snapshot materialized"
    );
    Ok(snapshot)
}

/// Write-temp-then-rename so readers never observe a partial snapshot.
pub fn write_snapshot(path: &Path, snapshot: &RuntimeSnapshot) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut body = serde_json::to_string_pretty(snapshot)?;
    body.push('\n');
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a snapshot, tolerating absence and corruption as `None`.
pub fn read_snapshot(path: &Path) -> Option<RuntimeSnapshot> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
