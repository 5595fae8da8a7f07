// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub issue snapshot: `gh` subprocess plus markdown rendering.

use cr_core::{format_local_datetime, Clock, SystemClock};
use serde_json::Value;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("gh spawn failed: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("gh exited with status {0}")]
    Status(i32),
    #[error("gh output decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// List open issues for a repo via the `gh` CLI.
pub fn run_gh_issue_list(repo: &str, limit: usize) -> Result<Vec<Value>, IssueError> {
    let output = Command::new("gh")
        .args([
            "issue",
            "list",
            "--repo",
            repo,
            "--state",
            "open",
            "--limit",
            &limit.to_string(),
            "--json",
            "number,title,url,labels,createdAt,updatedAt,author",
        ])
        .output()?;

    if !output.status.success() {
        return Err(IssueError::Status(output.status.code().unwrap_or(-1)));
    }

    let issues: Vec<Value> = serde_json::from_slice(&output.stdout)?;
    Ok(issues)
}

fn issue_labels(issue: &Value) -> String {
    let labels: Vec<&str> = issue
        .get("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| label.get("name").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();
    if labels.is_empty() {
        "none".to_string()
    } else {
        labels.join(", ")
    }
}

/// Render the triage snapshot markdown.
pub fn render_markdown(repo: &str, issues: &[Value]) -> String {
    let now = format_local_datetime(SystemClock.epoch_ms());
    let mut lines = Vec::new();

    lines.push("# Control Room Issue Snapshot".to_string());
    lines.push(String::new());
    lines.push(format!("- Repo: `{repo}`"));
    lines.push(format!("- Generated: {now}"));
    lines.push(format!("- Open issues: {}", issues.len()));
    lines.push(String::new());

    if issues.is_empty() {
        lines.push("No open issues right now. ✅".to_string());
        lines.push(String::new());
        return lines.join("\n");
    }

    lines.push("## Open issues".to_string());
    lines.push(String::new());

    for issue in issues {
        let number = issue
            .get("number")
            .and_then(Value::as_u64)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "?".to_string());
        let title = issue
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("(no title)");
        let url = issue.get("url").and_then(Value::as_str).unwrap_or("");
        let updated_at = issue.get("updatedAt").and_then(Value::as_str).unwrap_or("");

        lines.push(format!("### #{number} — {title}"));
        lines.push(format!("- URL: {url}"));
        lines.push(format!("- Labels: {}", issue_labels(issue)));
        lines.push(format!("- Updated: {updated_at}"));
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
#[path = "issues_tests.rs"]
mod tests;
