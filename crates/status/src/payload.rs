// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard payload assembly.
//!
//! Field order of `StatusPayload` is the wire key order; downstream
//! readers rely on it staying additive-only.

use crate::activity::{recent_activity, recent_findings, ActivityEntry};
use crate::dedupe::dedupe_next_lane;
use crate::lanes::{
    assemble_lanes, job_lane_events, runtime_lane_events, timeline_lane_events, LaneStore, Lanes,
};
use crate::markdown::{parse_plan_blocks, parse_section_bullets, parse_today_status, PlanBlock};
use crate::session_probe::{main_session_running, scan_session_transcript};
use crate::skills::{derive_skills, skill_artifacts, SkillGraph};
use crate::timeline::{is_future_or_untimed, resolve_active_work, resolve_current_focus};
use crate::trends::{job_success_trend, reliability_trend, TrendPoint, TREND_LIMIT};
use crate::version::control_room_version;
use crate::watchdog::{reliability_status, Reliability};
use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use cr_core::{format_local_datetime, Clock};
use cr_ledger::reconcile::degraded;
use cr_ledger::{
    is_excluded_job_name, read_snapshot, reconcile_live, ActiveRun, JobsFile, ProducerPaths,
    RuntimeSnapshot, SnapshotMode, DEFAULT_STALE_MS, SOURCE_MATERIALIZED_LEDGER,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A materialized snapshot older than this is not runtime truth anymore.
pub const SNAPSHOT_FRESH_MS: u64 = 90_000;

const FINDINGS_LIMIT: usize = 6;
const ACTIVITY_LIMIT: usize = 24;
const NEXT_JOBS_LIMIT: usize = 8;
const NEXT_LANE_CAP: usize = 5;

/// Every file the payload build reads or writes, derived from one
/// workspace root with per-field override.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub workspace: PathBuf,
    pub jobs_file: PathBuf,
    pub sessions_file: PathBuf,
    pub runs_dir: PathBuf,
    pub subagent_file: PathBuf,
    pub runtime_state_file: PathBuf,
    pub reliability_log: PathBuf,
    pub lane_state_file: PathBuf,
    pub manifest_file: PathBuf,
    pub main_session_file: Option<PathBuf>,
}

impl BuildPaths {
    pub fn for_workspace(workspace: &Path, jobs_file: &Path) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            jobs_file: jobs_file.to_path_buf(),
            sessions_file: workspace.join("sessions").join("sessions.json"),
            runs_dir: workspace.join("cron").join("runs"),
            subagent_file: workspace.join("subagents").join("runs.json"),
            runtime_state_file: workspace.join("status").join("runtime-state.json"),
            reliability_log: workspace.join("logs").join("reliability-watchdog.jsonl"),
            lane_state_file: workspace.join("status").join("lane-state.json"),
            manifest_file: workspace.join("package.json"),
            main_session_file: None,
        }
    }

    fn producer_paths(&self) -> ProducerPaths {
        ProducerPaths {
            jobs_file: self.jobs_file.clone(),
            sessions_file: self.sessions_file.clone(),
            runs_dir: self.runs_dir.clone(),
            subagent_file: self.subagent_file.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextJob {
    pub name: String,
    pub next_run: String,
    pub last_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charts {
    pub job_success_trend: Vec<TrendPoint>,
    pub reliability_trend: Vec<TrendPoint>,
}

/// The dashboard payload. Serialized key order is the field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub generated_at: String,
    pub generated_at_local: String,
    pub control_room_version: String,
    pub current_focus: String,
    pub active_work: String,
    pub reliability: Reliability,
    pub timeline: Vec<PlanBlock>,
    pub next_jobs: Vec<NextJob>,
    pub findings: Vec<String>,
    pub workstream: Lanes,
    pub charts: Charts,
    pub activity: Vec<ActivityEntry>,
    pub skills: SkillGraph,
    pub runtime: RuntimeSnapshot,
}

fn read_text(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

fn local_from_ms(now_ms: u64) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(now_ms as i64)
        .single()
        .unwrap_or_else(Local::now)
}

/// The next enabled jobs sorted by next run timestamp.
fn next_jobs(jobs: &JobsFile, limit: usize) -> Vec<NextJob> {
    let mut enabled: Vec<_> = jobs.jobs.iter().filter(|job| job.enabled).collect();
    enabled.sort_by_key(|job| job.next_run_at_ms().unwrap_or(u64::MAX));

    enabled
        .into_iter()
        .take(limit)
        .map(|job| NextJob {
            name: job.name.clone().unwrap_or_default(),
            next_run: match job.next_run_at_ms() {
                Some(ms) => cr_core::format_local_hhmm(ms),
                None => "n/a".to_string(),
            },
            last_status: job.last_status().map(str::to_string),
        })
        .collect()
}

fn main_session_row(session_file: &Path, now_ms: u64) -> ActiveRun {
    let activity = scan_session_transcript(session_file);
    let started_at_ms = activity.latest_user_at_ms.unwrap_or(now_ms);
    let last_seen_at_ms = activity
        .last_tool_at_ms
        .unwrap_or(started_at_ms)
        .max(started_at_ms);
    let session_name = session_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("main");

    ActiveRun {
        run_key: format!("main:{session_name}"),
        job_id: "main".to_string(),
        job_name: "Interactive session".to_string(),
        session_id: session_name.to_string(),
        session_key: format!("agent:main:{session_name}"),
        summary: "Interactive session".to_string(),
        started_at_ms,
        last_seen_at_ms,
        started_at_local: format_local_datetime(started_at_ms),
        running_for_ms: now_ms.saturating_sub(started_at_ms),
        activity_type: "main".to_string(),
        model: None,
        thinking: None,
    }
}

/// Pick the runtime source: a fresh materialized snapshot, else a live
/// reconciliation pass with degraded-reason annotations.
pub fn resolve_runtime(paths: &BuildPaths, now_ms: u64) -> RuntimeSnapshot {
    let mut extra: Vec<&str> = Vec::new();

    match read_snapshot(&paths.runtime_state_file) {
        Some(mut snapshot) => {
            let fresh = snapshot
                .materialized_at_ms
                .is_some_and(|at| now_ms.saturating_sub(at) <= SNAPSHOT_FRESH_MS);
            if fresh {
                snapshot
                    .active_runs
                    .retain(|row| !is_excluded_job_name(&row.job_name));
                for row in &mut snapshot.active_runs {
                    row.restamp(now_ms);
                }
                snapshot.refresh_status();
                snapshot.source = SOURCE_MATERIALIZED_LEDGER.to_string();
                snapshot.checked_at_ms = now_ms;
                return snapshot;
            }
            extra.push(degraded::MATERIALIZED_STATE_STALE);
        }
        None => extra.push(degraded::MATERIALIZED_STATE_MISSING),
    }

    let mut snapshot = reconcile_live(&paths.producer_paths(), now_ms, DEFAULT_STALE_MS, &extra);

    if let Some(session_file) = &paths.main_session_file {
        if main_session_running(session_file, now_ms) {
            snapshot.active_runs.push(main_session_row(session_file, now_ms));
            snapshot
                .active_runs
                .sort_by(|a, b| (a.started_at_ms, &a.run_key).cmp(&(b.started_at_ms, &b.run_key)));
            snapshot.refresh_status();
        }
    }

    snapshot
}

fn build_workstream(
    paths: &BuildPaths,
    timeline: &[PlanBlock],
    jobs: &JobsFile,
    runtime: &RuntimeSnapshot,
    status_markdown: &str,
    now_local: &DateTime<Local>,
    now_ms: u64,
) -> Lanes {
    let today = now_local.format("%Y-%m-%d").to_string();
    let now_minutes = now_local.hour() * 60 + now_local.minute();

    let store = LaneStore::new(&paths.lane_state_file);
    let mut state = store.load(&today);

    let mut future = timeline_lane_events(timeline, now_local);
    future.extend(job_lane_events(jobs, now_ms));
    let runtime_events = runtime_lane_events(&runtime.active_runs);

    let mut lanes = assemble_lanes(&future, &runtime_events, &mut state);

    // The status file may name upcoming work the timeline does not;
    // merge it in without restating blocks already covered.
    let status_next: Vec<String> =
        parse_section_bullets(status_markdown, "Next 3 meaningful blocks")
            .into_iter()
            .filter(|item| is_future_or_untimed(item, now_minutes))
            .collect();
    lanes.next = dedupe_next_lane(&lanes.next, &status_next);
    lanes.next.truncate(NEXT_LANE_CAP);

    store.save_or_warn(&state);
    lanes
}

/// Build the dashboard payload from current workspace state.
pub fn build_payload<C: Clock>(paths: &BuildPaths, clock: &C) -> StatusPayload {
    let now_ms = clock.epoch_ms();
    let now_local = local_from_ms(now_ms);
    let now_minutes = now_local.hour() * 60 + now_local.minute();
    let today = now_local.format("%Y-%m-%d").to_string();

    let plan_text = read_text(&paths.workspace.join("DAILY_PLAN.md"));
    let status_text = read_text(&paths.workspace.join("TODAY_STATUS.md"));
    let memory_text = read_text(
        &paths
            .workspace
            .join("memory")
            .join(format!("{today}.md")),
    );

    let status_fields = parse_today_status(&status_text);
    let timeline = parse_plan_blocks(&plan_text);

    let active_work = resolve_active_work(&status_fields.active_work, &timeline, now_minutes);
    let current_focus =
        resolve_current_focus(&status_fields.current_focus, &active_work, &timeline, now_minutes);

    let jobs = JobsFile::load(&paths.jobs_file);
    let runtime = resolve_runtime(paths, now_ms);
    let workstream = build_workstream(
        paths,
        &timeline,
        &jobs,
        &runtime,
        &status_text,
        &now_local,
        now_ms,
    );

    let (artifact_texts, artifact_paths) =
        skill_artifacts(&paths.workspace, now_local.date_naive());
    let skills = derive_skills(&artifact_texts, &artifact_paths, &today);

    let generated_at = Utc
        .timestamp_millis_opt(now_ms as i64)
        .single()
        .map(|instant| instant.to_rfc3339())
        .unwrap_or_default();

    StatusPayload {
        generated_at,
        generated_at_local: now_local.format("%Y-%m-%d %H:%M %Z").to_string(),
        control_room_version: control_room_version(&paths.manifest_file),
        current_focus,
        active_work,
        reliability: reliability_status(&paths.workspace),
        timeline,
        next_jobs: next_jobs(&jobs, NEXT_JOBS_LIMIT),
        findings: recent_findings(&memory_text, FINDINGS_LIMIT),
        workstream,
        charts: Charts {
            job_success_trend: job_success_trend(&jobs, TREND_LIMIT),
            reliability_trend: reliability_trend(&paths.reliability_log, TREND_LIMIT),
        },
        activity: recent_activity(&memory_text, ACTIVITY_LIMIT),
        skills,
        runtime,
    }
}

/// Scrub runtime truth out of a payload destined for a cached fallback
/// file. Whatever the input claimed, the result is idle.
pub fn sanitize_for_static_snapshot(mut payload: StatusPayload) -> StatusPayload {
    payload.runtime.active_runs.clear();
    payload.runtime.refresh_status();
    payload.runtime.snapshot_mode = SnapshotMode::FallbackSanitized;
    payload.runtime.degraded_reason = "static-snapshot-runtime-scrubbed".to_string();
    payload
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
