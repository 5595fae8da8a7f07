// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive main-session probe.
//!
//! The transcript is scanned in reverse from the latest user message; only
//! tool activity after that message can make the session count as running.
//! Plain chat never counts.

use cr_core::parse_timestamp_ms;
use serde_json::Value;
use std::fs;
use std::path::Path;

const PENDING_TOOL_WINDOW_MS: u64 = 10 * 60 * 1000;
const RECENT_TOOL_WINDOW_MS: u64 = 2 * 60 * 1000;
const LOCK_MAX_AGE_MS: u64 = 30 * 60 * 1000;

/// Observed shape of the interactive session transcript tail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainSessionActivity {
    pub latest_user_at_ms: Option<u64>,
    pub last_tool_at_ms: Option<u64>,
    pub pending_call_count: usize,
}

fn entry_timestamp(row: &Value) -> Option<u64> {
    row.get("ts")
        .and_then(parse_timestamp_ms)
        .or_else(|| row.get("timestamp").and_then(parse_timestamp_ms))
}

/// Reverse scan of a JSONL transcript: stop at the latest user message,
/// counting the tool events that follow it.
pub fn scan_session_transcript(session_file: &Path) -> MainSessionActivity {
    let Ok(text) = fs::read_to_string(session_file) else {
        return MainSessionActivity::default();
    };

    let mut activity = MainSessionActivity::default();
    let mut tool_calls = 0usize;
    let mut tool_results = 0usize;

    for raw in text.lines().rev() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(row) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        let kind = row.get("type").and_then(Value::as_str).unwrap_or("");
        let at_ms = entry_timestamp(&row);

        match kind {
            "user" => {
                activity.latest_user_at_ms = at_ms;
                break;
            }
            "tool_call" | "tool_use" => {
                tool_calls += 1;
                if let Some(at) = at_ms {
                    activity.last_tool_at_ms =
                        Some(activity.last_tool_at_ms.map_or(at, |cur| cur.max(at)));
                }
            }
            "tool_result" => {
                tool_results += 1;
                if let Some(at) = at_ms {
                    activity.last_tool_at_ms =
                        Some(activity.last_tool_at_ms.map_or(at, |cur| cur.max(at)));
                }
            }
            _ => {}
        }
    }

    activity.pending_call_count = tool_calls.saturating_sub(tool_results);
    activity
}

/// Liveness rule: the latest user message must be followed by tool
/// activity, and that activity must be recent: within ten minutes when a
/// call is still pending, within two minutes otherwise.
pub fn is_main_session_active(activity: &MainSessionActivity, now_ms: u64) -> bool {
    let Some(_) = activity.latest_user_at_ms else {
        return false;
    };
    let Some(last_tool_at_ms) = activity.last_tool_at_ms else {
        return false;
    };

    let tool_age_ms = now_ms.saturating_sub(last_tool_at_ms);
    if activity.pending_call_count > 0 && tool_age_ms <= PENDING_TOOL_WINDOW_MS {
        return true;
    }
    tool_age_ms <= RECENT_TOOL_WINDOW_MS
}

/// A sibling `<session>.lock` is honored only when fresh and, when it
/// names a pid, that pid is still alive. Anything else is ignored.
pub fn lock_is_live(lock_path: &Path, now_ms: u64) -> bool {
    let Ok(text) = fs::read_to_string(lock_path) else {
        return false;
    };
    let Ok(row) = serde_json::from_str::<Value>(&text) else {
        return false;
    };

    let Some(created_at_ms) = row.get("createdAt").and_then(parse_timestamp_ms) else {
        return false;
    };
    if now_ms.saturating_sub(created_at_ms) > LOCK_MAX_AGE_MS {
        return false;
    }

    if let Some(pid) = row.get("pid").and_then(Value::as_u64) {
        let proc_root = Path::new("/proc");
        if proc_root.exists() && !proc_root.join(pid.to_string()).exists() {
            return false;
        }
    }
    true
}

/// Combined decision for the payload builder.
///
/// The transcript rule decides; a live lock can stand in for recency when
/// tool activity exists but has briefly gone quiet. A transcript with no
/// tool events after the latest user message never counts.
pub fn main_session_running(session_file: &Path, now_ms: u64) -> bool {
    let activity = scan_session_transcript(session_file);
    if is_main_session_active(&activity, now_ms) {
        return true;
    }
    if activity.latest_user_at_ms.is_none() || activity.last_tool_at_ms.is_none() {
        return false;
    }
    let lock_path = session_file.with_extension("lock");
    lock_path.exists() && lock_is_live(&lock_path, now_ms)
}

#[cfg(test)]
#[path = "session_probe_tests.rs"]
mod tests;
