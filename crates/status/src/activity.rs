// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Activity feed and findings from the daily memory markdown.

use crate::timegrid::leading_clock_text;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub time: String,
    pub category: String,
    pub text: String,
}

const UI_KEYWORDS: &[&str] = &["react", "typescript", "dashboard", "ui", "vite"];
const RELIABILITY_KEYWORDS: &[&str] = &["watchdog", "reliability", "self-heal", "failover", "cron"];
const RELEASE_KEYWORDS: &[&str] = &["release", "tag", "version", "changelog"];
const DOCS_KEYWORDS: &[&str] = &["doc", "architecture", "readme", "agents.md"];

/// Keyword-based category for an activity line.
pub fn infer_activity_category(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|keyword| lowered.contains(keyword));

    if matches(UI_KEYWORDS) {
        "ui"
    } else if matches(RELIABILITY_KEYWORDS) {
        "reliability"
    } else if matches(RELEASE_KEYWORDS) {
        "release"
    } else if matches(DOCS_KEYWORDS) {
        "docs"
    } else {
        "ops"
    }
}

/// Walk `## heading` / `- bullet` pairs into a lightweight feed.
///
/// A heading that starts with `HH:MM` stamps its bullets with that time.
pub fn recent_activity(memory_markdown: &str, limit: usize) -> Vec<ActivityEntry> {
    let mut activities = Vec::new();
    let mut current_heading = String::new();
    let mut current_time = String::new();

    for raw in memory_markdown.lines() {
        let line = raw.trim();

        if let Some(heading) = line.strip_prefix("## ") {
            current_heading = heading.trim().to_string();
            current_time = leading_clock_text(&current_heading)
                .unwrap_or_default()
                .to_string();
            continue;
        }

        let Some(text) = line.strip_prefix("- ") else {
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let category = infer_activity_category(&format!("{current_heading} {text}"));
        activities.push(ActivityEntry {
            time: if current_time.is_empty() {
                "n/a".to_string()
            } else {
                current_time.clone()
            },
            category: category.to_string(),
            text: text.to_string(),
        });
    }

    let skip = activities.len().saturating_sub(limit);
    activities.into_iter().skip(skip).collect()
}

/// The last bullet lines of the memory file, as concise findings.
pub fn recent_findings(memory_markdown: &str, limit: usize) -> Vec<String> {
    let bullets: Vec<&str> = memory_markdown
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .collect();
    let skip = bullets.len().saturating_sub(limit);
    bullets
        .into_iter()
        .skip(skip)
        .map(|line| line.trim_start_matches(['-', ' ']).to_string())
        .collect()
}

#[cfg(test)]
#[path = "activity_tests.rs"]
mod tests;
