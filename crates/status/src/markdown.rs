// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan and status markdown parsers.

use crate::timegrid::find_time_range_span;
use serde::{Deserialize, Serialize};

/// One `### HH:MM-HH:MM — task` timeline block from the daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanBlock {
    pub time: String,
    pub task: String,
}

/// `- Primary focus:` / `- Running now:` fields; either may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFields {
    pub current_focus: String,
    pub active_work: String,
}

/// Parse a single plan heading line. The em-dash separator is required.
fn parse_plan_block(line: &str) -> Option<PlanBlock> {
    let line = line.trim();
    let rest = line.strip_prefix("###")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();

    let (span, _, _) = find_time_range_span(rest)?;
    if span.start != 0 {
        return None;
    }
    let time = rest[span.clone()].to_string();

    let after = &rest[span.end..];
    if !after.starts_with(char::is_whitespace) {
        return None;
    }
    let after = after.trim_start();
    let task = after.strip_prefix('—')?;
    if !task.starts_with(char::is_whitespace) {
        return None;
    }
    let task = task.trim_start();
    if task.is_empty() {
        return None;
    }

    Some(PlanBlock {
        time,
        task: task.to_string(),
    })
}

/// Extract timeline blocks from the daily-plan markdown.
pub fn parse_plan_blocks(plan_markdown: &str) -> Vec<PlanBlock> {
    plan_markdown.lines().filter_map(parse_plan_block).collect()
}

/// Extract primary focus and active work from the status markdown.
pub fn parse_today_status(status_markdown: &str) -> StatusFields {
    let mut fields = StatusFields::default();
    for raw in status_markdown.lines() {
        let line = raw.trim();
        if let Some(value) = line.strip_prefix("- Primary focus:") {
            fields.current_focus = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("- Running now:") {
            fields.active_work = value.trim().to_string();
        }
    }
    fields
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

/// Top-level `- ` bullets under a `## <section_name>` heading, terminated
/// at the next `## ` heading.
pub fn parse_section_bullets(markdown: &str, section_name: &str) -> Vec<String> {
    let wanted = section_name.trim().to_lowercase();
    let mut in_section = false;
    let mut bullets = Vec::new();

    for raw in markdown.lines() {
        let line = raw.trim();

        if let Some(heading) = heading_text(line) {
            in_section = heading.to_lowercase() == wanted;
            continue;
        }
        if !in_section {
            continue;
        }
        if let Some(text) = line.strip_prefix("- ") {
            let text = text.trim();
            if !text.is_empty() {
                bullets.push(text.to_string());
            }
        }
    }

    bullets
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
