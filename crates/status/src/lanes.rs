// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workstream lanes: now / next / done.
//!
//! Timeline blocks, future scheduled jobs, and live runtime rows are
//! unified into one event model. Per-day lane state remembers which event
//! ids have been surfaced as "now" so that finished work transitions into
//! the done lane instead of flickering away. Lane logic is a pure function
//! over `(events, state)`; the store only loads and rewrites the file.

use crate::timegrid::is_clock;
use chrono::{DateTime, Local, TimeZone, Timelike};
use cr_core::format_local_hhmm;
use cr_ledger::{ActiveRun, JobsFile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

const NEXT_LANE_CAP: usize = 5;
const DONE_LANE_CAP: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    Timeline,
    Job,
    Runtime,
}

/// One unified lane event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneEvent {
    pub id: String,
    pub label: String,
    pub start_ms: Option<u64>,
    pub kind: LaneKind,
}

/// Persisted per-day lane memory. Resets on day change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaneState {
    pub day: String,
    pub seen_now: BTreeSet<String>,
    pub done: Vec<String>,
    pub labels: BTreeMap<String, String>,
}

/// The three ordered label lists surfaced in the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lanes {
    pub now: Vec<String>,
    pub next: Vec<String>,
    pub done: Vec<String>,
}

/// Lane-state file access: whole-file read, whole-file rewrite.
pub struct LaneStore {
    path: PathBuf,
}

impl LaneStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load state for `day`; any other day (or an unreadable file) resets.
    pub fn load(&self, day: &str) -> LaneState {
        let fresh = LaneState {
            day: day.to_string(),
            ..LaneState::default()
        };
        let Ok(text) = fs::read_to_string(&self.path) else {
            return fresh;
        };
        let Ok(state) = serde_json::from_str::<LaneState>(&text) else {
            return fresh;
        };
        if state.day == day {
            state
        } else {
            fresh
        }
    }

    /// Replace the file via write-temp-then-rename.
    pub fn save(&self, state: &LaneState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut body = serde_json::to_string_pretty(state).map_err(std::io::Error::other)?;
        body.push('\n');
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Save, demoting failure to a warning; lanes are display state.
    pub fn save_or_warn(&self, state: &LaneState) {
        if let Err(err) = self.save(state) {
            warn!(path = %self.path.display(), error = %err, "lane state save failed");
        }
    }
}

fn local_ms(now_local: &DateTime<Local>, minutes: u32) -> Option<u64> {
    let midnight = now_local
        .date_naive()
        .and_hms_opt(minutes / 60, minutes % 60, 0)?;
    let stamped = Local.from_local_datetime(&midnight).earliest()?;
    u64::try_from(stamped.timestamp_millis()).ok()
}

/// Plan blocks that have not ended yet, stamped on today's date.
pub fn timeline_lane_events(
    timeline: &[crate::markdown::PlanBlock],
    now_local: &DateTime<Local>,
) -> Vec<LaneEvent> {
    let now_minutes = now_local.hour() * 60 + now_local.minute();
    let date = now_local.format("%Y-%m-%d").to_string();

    timeline
        .iter()
        .filter_map(|block| {
            let range = crate::timegrid::parse_time_range(&block.time)?;
            if range.end <= now_minutes {
                return None;
            }
            let label = format!("{} — {}", block.time, block.task.trim());
            Some(LaneEvent {
                id: format!(
                    "timeline:{date}:{}:{}",
                    block.time,
                    block.task.trim().to_lowercase()
                ),
                label,
                start_ms: local_ms(now_local, range.start),
                kind: LaneKind::Timeline,
            })
        })
        .collect()
}

/// Enabled jobs whose next run is still in the future.
pub fn job_lane_events(jobs: &JobsFile, now_ms: u64) -> Vec<LaneEvent> {
    jobs.jobs
        .iter()
        .filter(|job| job.enabled)
        .filter_map(|job| {
            let next_run_at_ms = job.next_run_at_ms()?;
            if next_run_at_ms <= now_ms {
                return None;
            }
            let job_id = job.id.as_deref()?;
            let name = job.name.as_deref().unwrap_or(job_id);
            Some(LaneEvent {
                id: format!("job:{job_id}:{next_run_at_ms}"),
                label: format!(
                    "{} — Scheduled job: {name}",
                    format_local_hhmm(next_run_at_ms)
                ),
                start_ms: Some(next_run_at_ms),
                kind: LaneKind::Job,
            })
        })
        .collect()
}

/// Live active-run rows as lane events; the run summary is the label.
pub fn runtime_lane_events(active_runs: &[ActiveRun]) -> Vec<LaneEvent> {
    active_runs
        .iter()
        .map(|run| LaneEvent {
            id: format!("runtime:{}", run.session_id),
            label: run.summary.clone(),
            start_ms: Some(run.started_at_ms),
            kind: LaneKind::Runtime,
        })
        .collect()
}

/// A done label gets a canonical time prefix: a leading range collapses
/// to its end time, a bare leading clock is preserved.
fn rewrite_done_label(label: &str) -> String {
    let Some((prefix, rest)) = label.split_once(" — ") else {
        return label.to_string();
    };
    if let Some((start, end)) = prefix.split_once('-') {
        if is_clock(start) && is_clock(end) {
            return format!("{end} — {rest}");
        }
    }
    label.to_string()
}

fn label_for(state: &LaneState, id: &str) -> String {
    state
        .labels
        .get(id)
        .cloned()
        .unwrap_or_else(|| id.to_string())
}

/// Assemble the three lanes and fold this build's observations into the
/// persisted state.
pub fn assemble_lanes(
    future_events: &[LaneEvent],
    runtime_events: &[LaneEvent],
    state: &mut LaneState,
) -> Lanes {
    let mut future = future_events.to_vec();
    future.sort_by(|a, b| {
        (a.start_ms.unwrap_or(0), a.id.as_str()).cmp(&(b.start_ms.unwrap_or(0), b.id.as_str()))
    });

    let (now_events, next_events): (Vec<&LaneEvent>, Vec<&LaneEvent>) =
        if let Some(first_runtime) = runtime_events.first() {
            (vec![first_runtime], future.iter().collect())
        } else if let Some((first, rest)) = future.split_first() {
            (vec![first], rest.iter().collect())
        } else {
            (Vec::new(), Vec::new())
        };

    // Refresh labels for everything visible this build.
    for event in now_events
        .iter()
        .copied()
        .chain(next_events.iter().copied())
        .chain(runtime_events.iter())
    {
        state.labels.insert(event.id.clone(), event.label.clone());
    }

    for event in &now_events {
        state.seen_now.insert(event.id.clone());
    }

    // Ids that were surfaced as "now" before and are gone from both the
    // now lane and the future set have finished: promote to done.
    let visible: HashSet<&str> = now_events
        .iter()
        .map(|event| event.id.as_str())
        .chain(future.iter().map(|event| event.id.as_str()))
        .collect();
    let transitioned: Vec<String> = state
        .seen_now
        .iter()
        .filter(|id| !visible.contains(id.as_str()))
        .cloned()
        .collect();
    for id in transitioned {
        if !state.done.contains(&id) {
            state.done.push(id);
        }
    }

    let now_labels: Vec<String> = now_events
        .iter()
        .map(|event| label_for(state, &event.id))
        .collect();

    let mut next_labels = Vec::new();
    for event in &next_events {
        let label = label_for(state, &event.id);
        if now_labels.contains(&label) || next_labels.contains(&label) {
            continue;
        }
        next_labels.push(label);
        if next_labels.len() >= NEXT_LANE_CAP {
            break;
        }
    }

    let mut done_labels = Vec::new();
    for id in state.done.iter().rev() {
        let label = rewrite_done_label(&label_for(state, id));
        if now_labels.contains(&label)
            || next_labels.contains(&label)
            || done_labels.contains(&label)
        {
            continue;
        }
        done_labels.push(label);
        if done_labels.len() >= DONE_LANE_CAP {
            break;
        }
    }

    Lanes {
        now: now_labels,
        next: next_labels,
        done: done_labels,
    }
}

#[cfg(test)]
#[path = "lanes_tests.rs"]
mod tests;
