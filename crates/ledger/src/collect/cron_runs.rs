// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron run-log collector: terminal events from per-job JSONL files.

use super::{ms_field, str_field};
use cr_core::{build_event, EventPayload, EventType, RunKey, RuntimeEvent, SOURCE_CRON_RUNS};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp fallback chain for a finished-run record, in order.
const FINISHED_AT_FIELDS: &[&str] = &["finishedAtMs", "finishedAt", "endedAt", "timestamp", "ts"];

/// One terminal event per `action == "finished"` line.
///
/// The file stem is the job id; the source offset pins the exact line so a
/// rewritten log never collides with a fresh observation.
pub fn collect_cron_terminal_events(runs_dir: &Path) -> Vec<RuntimeEvent> {
    let Ok(entries) = fs::read_dir(runs_dir) else {
        return Vec::new();
    };

    let mut run_files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("jsonl"))
        .collect();
    run_files.sort();

    let mut events = Vec::new();
    for run_file in run_files {
        let Some(job_id) = run_file.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let Some(file_name) = run_file.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let Ok(text) = fs::read_to_string(&run_file) else {
            continue;
        };

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(Value::Object(row)) = serde_json::from_str::<Value>(line) else {
                continue;
            };
            if row.get("action").and_then(Value::as_str) != Some("finished") {
                continue;
            }
            let Some(session_id) = str_field(&row, "sessionId") else {
                continue;
            };
            let Some(event_at_ms) = FINISHED_AT_FIELDS
                .iter()
                .find_map(|field| ms_field(&row, field))
            else {
                continue;
            };
            let Some(run_key) = RunKey::cron(job_id, session_id) else {
                continue;
            };

            let terminal = str_field(&row, "status")
                .or_else(|| str_field(&row, "result"))
                .map(EventType::normalize_terminal)
                .unwrap_or(EventType::Finished);

            let payload = EventPayload {
                job_id: Some(job_id.to_string()),
                session_id: Some(session_id.to_string()),
                status: Some(terminal.as_str().to_string()),
                ..EventPayload::default()
            };

            events.push(build_event(
                run_key,
                terminal,
                event_at_ms,
                SOURCE_CRON_RUNS,
                &format!("{file_name}:{line_no}", line_no = index + 1),
                payload,
            ));
        }
    }

    events
}
