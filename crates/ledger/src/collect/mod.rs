// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Producer collectors: scan native artifacts, emit canonical events.
//!
//! Each producer disagrees about timestamps, field names, and terminal
//! labels; these modules own the projection into the closed event
//! vocabulary. Missing files contribute nothing, malformed records are
//! skipped, nothing here is fatal.

mod cron_runs;
mod sessions;
mod subagents;

pub use cron_runs::collect_cron_terminal_events;
pub use sessions::{collect_session_events, parse_cron_run_session_key};
pub use subagents::collect_subagent_events;

use crate::scheduler::JobCatalog;
use cr_core::{sort_events, RuntimeEvent};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem locations of the producer artifacts.
#[derive(Debug, Clone)]
pub struct ProducerPaths {
    pub jobs_file: PathBuf,
    pub sessions_file: PathBuf,
    pub runs_dir: PathBuf,
    pub subagent_file: PathBuf,
}

/// Scan every producer and return the union, canonically sorted.
pub fn collect_events(paths: &ProducerPaths) -> Vec<RuntimeEvent> {
    let jobs = JobCatalog::load(&paths.jobs_file);
    let mut events = collect_session_events(&paths.sessions_file, &jobs);
    events.extend(collect_cron_terminal_events(&paths.runs_dir));
    events.extend(collect_subagent_events(&paths.subagent_file));
    sort_events(&mut events);
    events
}

pub(crate) fn read_json_object(path: &Path) -> Option<Map<String, Value>> {
    let text = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Non-empty trimmed string field, or `None`.
pub(crate) fn str_field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) fn ms_field(record: &Map<String, Value>, key: &str) -> Option<u64> {
    record.get(key).and_then(cr_core::parse_timestamp_ms)
}

#[cfg(test)]
#[path = "../collect_tests.rs"]
mod tests;
