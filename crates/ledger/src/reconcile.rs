// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live reconciliation: producer-direct active truth for when the
//! materialized snapshot is missing or stale.
//!
//! Uses the same canonical projection and fold as the journal path, but
//! reads the producers on the spot and never touches the snapshot file.

use crate::collect::{
    collect_cron_terminal_events, collect_session_events, collect_subagent_events, ProducerPaths,
};
use crate::reduce::reduce_events;
use crate::scheduler::JobCatalog;
use crate::snapshot::{RuntimeSnapshot, RuntimeStatus, SnapshotMode, SOURCE_LIVE_RECONCILER};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Job names that must never surface as runtime truth. The publisher's
/// own run would otherwise keep the dashboard flagged busy forever.
const EXCLUDED_RUNTIME_JOB_NAME_SUBSTRINGS: &[&str] = &["control room status publish"];

/// Degraded-reason tags, comma-joined into `degradedReason`.
pub mod degraded {
    pub const SESSIONS_STORE_MISSING: &str = "sessions-store-missing";
    pub const SESSIONS_STORE_INVALID: &str = "sessions-store-invalid";
    pub const SESSIONS_STORE_UNEXPECTED_SHAPE: &str = "sessions-store-unexpected-shape";
    pub const MATERIALIZED_STATE_MISSING: &str = "materialized-state-missing";
    pub const MATERIALIZED_STATE_STALE: &str = "materialized-state-stale";
}

pub fn is_excluded_job_name(job_name: &str) -> bool {
    let normalized = job_name.to_lowercase();
    EXCLUDED_RUNTIME_JOB_NAME_SUBSTRINGS
        .iter()
        .any(|token| normalized.contains(token))
}

/// Classify the sessions store for degraded-reason reporting.
pub fn sessions_store_degradation(sessions_file: &Path) -> Option<&'static str> {
    if !sessions_file.exists() {
        return Some(degraded::SESSIONS_STORE_MISSING);
    }
    let Ok(text) = fs::read_to_string(sessions_file) else {
        return Some(degraded::SESSIONS_STORE_INVALID);
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(_)) => None,
        Ok(_) => Some(degraded::SESSIONS_STORE_UNEXPECTED_SHAPE),
        Err(_) => Some(degraded::SESSIONS_STORE_INVALID),
    }
}

/// Reconcile active truth straight from the producers.
///
/// `extra_degraded` carries tags the caller already knows about (for
/// example why the materialized snapshot was not usable).
pub fn reconcile_live(
    paths: &ProducerPaths,
    now_ms: u64,
    stale_ms: u64,
    extra_degraded: &[&str],
) -> RuntimeSnapshot {
    let jobs = JobCatalog::load(&paths.jobs_file);
    let mut events = collect_session_events(&paths.sessions_file, &jobs);
    events.extend(collect_cron_terminal_events(&paths.runs_dir));
    events.extend(collect_subagent_events(&paths.subagent_file));

    let reduction = reduce_events(&events, now_ms, stale_ms);
    let active_runs: Vec<_> = reduction
        .active_rows
        .into_iter()
        .filter(|row| !is_excluded_job_name(&row.job_name))
        .collect();

    let mut reasons: Vec<&str> = extra_degraded.to_vec();
    if let Some(tag) = sessions_store_degradation(&paths.sessions_file) {
        reasons.push(tag);
    }
    if !reasons.is_empty() {
        warn!(degraded = %reasons.join(","), "live reconciliation is degraded");
    }

    let mut snapshot = RuntimeSnapshot {
        status: RuntimeStatus::Idle,
        is_idle: true,
        active_count: 0,
        active_runs,
        checked_at_ms: now_ms,
        source: SOURCE_LIVE_RECONCILER.to_string(),
        revision: crate::snapshot::format_revision(now_ms),
        snapshot_mode: SnapshotMode::Live,
        degraded_reason: reasons.join(","),
        materialized_at_ms: None,
        terminal_count: reduction.terminals.len(),
        dropped_stale_count: reduction.dropped_stale,
    };
    snapshot.refresh_status();
    snapshot
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
