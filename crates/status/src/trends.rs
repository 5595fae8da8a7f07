// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chart trend points: job run quality and watchdog reliability.

use cr_core::format_local_hhmm;
use cr_ledger::JobsFile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const TREND_LIMIT: usize = 14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub status: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
}

/// Map a status label onto the chart score scale.
pub fn status_score(status: &str) -> f64 {
    match status.to_lowercase().as_str() {
        "ok" | "green" | "success" => 1.0,
        "yellow" | "warn" | "warning" => 0.55,
        "error" | "red" | "failed" => 0.0,
        _ => 0.35,
    }
}

/// Recent run-quality points from enabled jobs' last-run state, ascending
/// by run time, trimmed to the newest `limit`.
pub fn job_success_trend(jobs: &JobsFile, limit: usize) -> Vec<TrendPoint> {
    let mut points: Vec<(u64, TrendPoint)> = jobs
        .jobs
        .iter()
        .filter(|job| job.enabled)
        .filter_map(|job| {
            let last_run_at_ms = job.last_run_at_ms()?;
            let status = job.last_status().unwrap_or("unknown").to_lowercase();
            Some((
                last_run_at_ms,
                TrendPoint {
                    label: format_local_hhmm(last_run_at_ms),
                    score: status_score(&status),
                    status,
                    job: Some(job.name.clone().unwrap_or_default()),
                },
            ))
        })
        .collect();

    points.sort_by_key(|(ts, _)| *ts);
    let skip = points.len().saturating_sub(limit);
    points.into_iter().skip(skip).map(|(_, point)| point).collect()
}

fn reliability_record_status(row: &Value) -> String {
    let nested = row
        .get("postHealth")
        .and_then(|health| health.get("status"))
        .and_then(Value::as_str)
        .or_else(|| {
            row.get("health")
                .and_then(|health| health.get("status"))
                .and_then(Value::as_str)
        });
    match nested {
        Some(status) => status.to_lowercase(),
        None => {
            if row.get("guardrailTriggered").and_then(Value::as_bool) == Some(true) {
                "yellow".to_string()
            } else {
                "green".to_string()
            }
        }
    }
}

/// Reliability points from the newline-delimited watchdog log.
pub fn reliability_trend(log_file: &Path, limit: usize) -> Vec<TrendPoint> {
    let Ok(text) = fs::read_to_string(log_file) else {
        return Vec::new();
    };

    let mut points: Vec<(u64, TrendPoint)> = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(row) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let Some(ts) = row.get("ts").and_then(Value::as_u64) else {
            continue;
        };
        let status = reliability_record_status(&row);
        points.push((
            ts,
            TrendPoint {
                label: format_local_hhmm(ts),
                score: status_score(&status),
                status,
                job: None,
            },
        ));
    }

    points.sort_by_key(|(ts, _)| *ts);
    let skip = points.len().saturating_sub(limit);
    points.into_iter().skip(skip).map(|(_, point)| point).collect()
}

#[cfg(test)]
#[path = "trends_tests.rs"]
mod tests;
