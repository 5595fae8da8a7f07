// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeline slicing and active-work / current-focus resolution.

use crate::markdown::PlanBlock;
use crate::timegrid::{leading_clock_minutes, parse_time_range, strip_first_time_range};

/// Completion markers that age out an active-work string quickly.
const COMPLETION_TOKENS: &[&str] = &["complete", "completed", "done", "finished"];

/// Placeholder focus values that should be resolved away.
const EMPTY_FOCUS_VALUES: &[&str] = &["n/a", "na", "none", "unknown"];

/// Grace after a block's end before a time-ranged value counts as stale.
const RANGE_GRACE_MINUTES: u32 = 10;
/// Age limits for `HH:MM`-prefixed values without a range.
const TIMED_STALE_MINUTES: u32 = 90;
const COMPLETED_STALE_MINUTES: u32 = 15;

/// A plan block with its parsed minute range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineBlock {
    pub time: String,
    pub task: String,
    pub start: u32,
    pub end: u32,
}

/// Timeline slices around "now".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineContext {
    pub current: Option<TimelineBlock>,
    pub next: Vec<TimelineBlock>,
    pub completed: Vec<TimelineBlock>,
}

/// `HH:MM-HH:MM — task` display form.
pub fn format_block(block: &TimelineBlock) -> String {
    format!("{} — {}", block.time, block.task.trim())
        .trim()
        .to_string()
}

fn normalized_blocks(timeline: &[PlanBlock]) -> Vec<TimelineBlock> {
    timeline
        .iter()
        .filter_map(|block| {
            let range = parse_time_range(&block.time)?;
            Some(TimelineBlock {
                time: block.time.clone(),
                task: block.task.clone(),
                start: range.start,
                end: range.end,
            })
        })
        .collect()
}

/// Slice the timeline into current/next/completed around `now_minutes`.
///
/// When the day's final block has passed, everything is completed.
pub fn timeline_context(timeline: &[PlanBlock], now_minutes: u32) -> TimelineContext {
    let normalized = normalized_blocks(timeline);

    let mut context = TimelineContext::default();
    for block in &normalized {
        if block.start <= now_minutes && now_minutes < block.end {
            context.current = Some(block.clone());
        } else if now_minutes < block.start {
            context.next.push(block.clone());
        } else if block.end <= now_minutes {
            context.completed.push(block.clone());
        }
    }

    if context.current.is_none() && context.next.is_empty() && !normalized.is_empty() {
        context.completed = normalized;
    }

    context
}

fn contains_completion_token(text: &str) -> bool {
    let lowered = text.to_lowercase();
    COMPLETION_TOKENS.iter().any(|token| lowered.contains(token))
}

/// Whether the raw `Running now` value has aged out.
///
/// A time-ranged value is stale past its end plus a short grace. A value
/// that merely starts with a clock ages out after 90 minutes, or 15 when
/// it claims completion. A completion claim with no resolvable time is
/// stale on sight.
pub fn is_stale_active_work(active_work: &str, now_minutes: u32) -> bool {
    if let Some(range) = parse_time_range(active_work) {
        return now_minutes > range.end + RANGE_GRACE_MINUTES;
    }

    let has_completion = contains_completion_token(active_work);
    if let Some(start) = leading_clock_minutes(active_work) {
        let limit = if has_completion {
            COMPLETED_STALE_MINUTES
        } else {
            TIMED_STALE_MINUTES
        };
        return now_minutes.saturating_sub(start) > limit;
    }

    has_completion
}

/// Resolve active work with the stale guard and timeline fallback.
pub fn resolve_active_work(
    raw_active_work: &str,
    timeline: &[PlanBlock],
    now_minutes: u32,
) -> String {
    let context = timeline_context(timeline, now_minutes);

    if !raw_active_work.is_empty() && !is_stale_active_work(raw_active_work, now_minutes) {
        return raw_active_work.to_string();
    }

    if let Some(current) = &context.current {
        return format_block(current);
    }
    if let Some(next) = context.next.first() {
        return format!("Next up: {}", format_block(next));
    }

    raw_active_work.to_string()
}

/// Resolve current focus with fallbacks for a stale or incomplete status
/// file.
pub fn resolve_current_focus(
    raw_focus: &str,
    active_work: &str,
    timeline: &[PlanBlock],
    now_minutes: u32,
) -> String {
    let normalized = raw_focus.trim();
    if !normalized.is_empty() && !EMPTY_FOCUS_VALUES.contains(&normalized.to_lowercase().as_str()) {
        return normalized.to_string();
    }

    let context = timeline_context(timeline, now_minutes);
    if let Some(current) = &context.current {
        if !current.task.is_empty() {
            return current.task.clone();
        }
    }

    if !active_work.is_empty() {
        // Strip a leading time-range for cleaner focus text.
        let stripped = strip_first_time_range(active_work);
        let stripped = stripped.trim_start_matches([' ', '—', '-', ':']);
        if !stripped.is_empty() {
            return stripped.to_string();
        }
        return active_work.to_string();
    }

    if let Some(next) = context.next.first() {
        return next.task.clone();
    }

    "Reliability monitoring + scheduled execution".to_string()
}

/// Future or untimed items stay in the next lane; ended blocks drop out.
pub fn is_future_or_untimed(item: &str, now_minutes: u32) -> bool {
    match parse_time_range(item) {
        Some(range) => range.end > now_minutes,
        None => true,
    }
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
