// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal replay: absorbing-terminal fold into the active-run view.
//!
//! Events are facts about what happened; the active set is derived from
//! those facts. The fold is deterministic over the canonically sorted
//! stream, so any permutation of the same event multiset replays to the
//! same rows.

use cr_core::{format_local_datetime, sort_events, EventType, RuntimeEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Materialized view of one still-running execution.
///
/// Invariant: `last_seen_at_ms >= started_at_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRun {
    pub run_key: String,
    pub job_id: String,
    pub job_name: String,
    pub session_id: String,
    pub session_key: String,
    pub summary: String,
    pub started_at_ms: u64,
    pub last_seen_at_ms: u64,
    pub started_at_local: String,
    pub running_for_ms: u64,
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
}

impl ActiveRun {
    /// Re-stamp the display fields relative to a newer `now`.
    pub fn restamp(&mut self, now_ms: u64) {
        self.running_for_ms = now_ms.saturating_sub(self.started_at_ms);
        self.started_at_local = format_local_datetime(self.started_at_ms);
    }
}

/// First terminal observed for a run key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalMark {
    pub event_type: EventType,
    pub event_at_ms: u64,
}

/// Candidate state while folding running events for one run key.
#[derive(Debug, Clone, Default)]
struct RunCandidate {
    started_at_ms: Option<u64>,
    last_seen_at_ms: Option<u64>,
    first_seen_at_ms: Option<u64>,
    job_id: Option<String>,
    job_name: Option<String>,
    session_id: Option<String>,
    session_key: Option<String>,
    summary: Option<String>,
    activity_type: Option<String>,
    model: Option<String>,
    thinking: Option<String>,
}

/// Outcome of one reduction pass.
#[derive(Debug, Clone, Default)]
pub struct Reduction {
    pub active_rows: Vec<ActiveRun>,
    pub terminals: BTreeMap<String, TerminalMark>,
    pub dropped_stale: usize,
}

fn merge_field(existing: &mut Option<String>, incoming: &Option<String>) {
    if let Some(value) = incoming {
        if !value.is_empty() {
            *existing = Some(value.clone());
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Fold the event multiset into active rows and terminal marks.
///
/// Terminal dominance is absorbing: once a run key records a terminal,
/// every later event for that key is dropped. After the fold, candidates
/// whose `last_seen_at_ms` fell outside the freshness window are expired
/// with a synthetic `stale_expired` terminal stamped at `now_ms`.
pub fn reduce_events(events: &[RuntimeEvent], now_ms: u64, stale_ms: u64) -> Reduction {
    let mut sorted = events.to_vec();
    sort_events(&mut sorted);

    let mut active: BTreeMap<String, RunCandidate> = BTreeMap::new();
    let mut terminals: BTreeMap<String, TerminalMark> = BTreeMap::new();

    for event in &sorted {
        let run_key = event.run_key.as_str();
        if run_key.is_empty() {
            continue;
        }
        if terminals.contains_key(run_key) {
            // Absorbing terminal states: never reopen.
            continue;
        }

        if event.event_type.is_terminal() {
            terminals.insert(
                run_key.to_string(),
                TerminalMark {
                    event_type: event.event_type,
                    event_at_ms: event.event_at_ms,
                },
            );
            active.remove(run_key);
            continue;
        }

        if !event.event_type.is_running() {
            continue;
        }

        let candidate = active.entry(run_key.to_string()).or_default();

        let candidate_start = event.payload.started_at_ms.unwrap_or(event.event_at_ms);
        candidate.started_at_ms = Some(
            candidate
                .started_at_ms
                .map_or(candidate_start, |current| current.min(candidate_start)),
        );

        let candidate_seen = event.payload.last_seen_at_ms.unwrap_or(event.event_at_ms);
        candidate.last_seen_at_ms = Some(
            candidate
                .last_seen_at_ms
                .map_or(candidate_seen, |current| current.max(candidate_seen)),
        );

        candidate.first_seen_at_ms.get_or_insert(event.event_at_ms);

        merge_field(&mut candidate.job_id, &event.payload.job_id);
        merge_field(&mut candidate.job_name, &event.payload.job_name);
        merge_field(&mut candidate.session_id, &event.payload.session_id);
        merge_field(&mut candidate.session_key, &event.payload.session_key);
        merge_field(&mut candidate.activity_type, &event.payload.activity_type);
        merge_field(&mut candidate.model, &event.payload.model);
        merge_field(&mut candidate.thinking, &event.payload.thinking);

        if event.payload.summary.as_deref().is_some_and(|s| !s.is_empty()) {
            candidate.summary = event.payload.summary.clone();
        } else if candidate.summary.is_none() {
            candidate.summary = event.payload.job_name.clone().filter(|s| !s.is_empty());
        }
    }

    let mut dropped_stale = 0;
    let keys: Vec<String> = active.keys().cloned().collect();
    for run_key in keys {
        let Some(last_seen_at_ms) = active.get(&run_key).and_then(|c| c.last_seen_at_ms) else {
            active.remove(&run_key);
            dropped_stale += 1;
            continue;
        };
        if now_ms.saturating_sub(last_seen_at_ms) > stale_ms {
            terminals.insert(
                run_key.clone(),
                TerminalMark {
                    event_type: EventType::StaleExpired,
                    event_at_ms: now_ms,
                },
            );
            active.remove(&run_key);
            dropped_stale += 1;
        }
    }

    let mut active_rows: Vec<ActiveRun> = active
        .iter()
        .map(|(run_key, candidate)| make_row(run_key, candidate, now_ms))
        .collect();
    active_rows.sort_by(|a, b| {
        (a.started_at_ms, a.run_key.as_str()).cmp(&(b.started_at_ms, b.run_key.as_str()))
    });

    Reduction {
        active_rows,
        terminals,
        dropped_stale,
    }
}

fn make_row(run_key: &str, state: &RunCandidate, now_ms: u64) -> ActiveRun {
    let started_at_ms = state
        .started_at_ms
        .or(state.first_seen_at_ms)
        .unwrap_or(now_ms);
    let last_seen_at_ms = state.last_seen_at_ms.unwrap_or(started_at_ms).max(started_at_ms);

    let job_name = non_empty(&state.job_name)
        .or_else(|| non_empty(&state.summary))
        .unwrap_or_else(|| "Running activity".to_string());
    let summary = non_empty(&state.summary)
        .or_else(|| non_empty(&state.job_name))
        .unwrap_or_else(|| "Running activity".to_string());

    ActiveRun {
        run_key: run_key.to_string(),
        job_id: non_empty(&state.job_id).unwrap_or_else(|| run_key.to_string()),
        job_name,
        session_id: non_empty(&state.session_id)
            .or_else(|| non_empty(&state.session_key))
            .unwrap_or_else(|| run_key.to_string()),
        session_key: non_empty(&state.session_key)
            .or_else(|| non_empty(&state.session_id))
            .unwrap_or_else(|| run_key.to_string()),
        summary,
        started_at_ms,
        last_seen_at_ms,
        started_at_local: format_local_datetime(started_at_ms),
        running_for_ms: now_ms.saturating_sub(started_at_ms),
        activity_type: non_empty(&state.activity_type).unwrap_or_else(|| "cron".to_string()),
        model: non_empty(&state.model),
        thinking: non_empty(&state.thinking),
    }
}

#[cfg(test)]
#[path = "reduce_tests.rs"]
mod tests;
