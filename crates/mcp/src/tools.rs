// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool handlers behind `tools/call`.
//!
//! Handler failures are caller-visible (`isError: true`), never fatal to
//! the server process.

use cr_core::{Clock, SystemClock};
use cr_ledger::DEFAULT_STALE_MS;
use cr_status::{
    build_payload, extract_release_notes, sanitize_for_static_snapshot, BuildPaths,
};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Failed(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

fn invalid(message: impl Into<String>) -> ToolError {
    ToolError::Invalid(message.into())
}

/// Resolve a caller path against the server root; empty means default.
fn resolve_path(root: &Path, raw: Option<&str>, default: PathBuf) -> PathBuf {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            let candidate = PathBuf::from(raw);
            if candidate.is_absolute() {
                candidate
            } else {
                root.join(candidate)
            }
        }
        None => default,
    }
}

fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str)
}

fn write_text(path: &Path, body: &str) -> Result<(), ToolError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, body)?;
    Ok(())
}

pub(crate) fn issue_snapshot(root: &Path, args: &Map<String, Value>) -> Result<Value, ToolError> {
    let Some(repo) = str_arg(args, "repo").map(str::trim).filter(|repo| !repo.is_empty()) else {
        return Err(invalid("repo is required"));
    };
    let limit = args
        .get("limit")
        .and_then(Value::as_u64)
        .unwrap_or(50)
        .clamp(1, 200) as usize;

    let issues = cr_status::issues::run_gh_issue_list(repo, limit)
        .map_err(|err| ToolError::Failed(err.to_string()))?;
    let markdown = cr_status::issues::render_markdown(repo, &issues);

    let out = str_arg(args, "out")
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| resolve_path(root, Some(raw), root.join("status").join("issue-snapshot.md")));
    if let Some(out) = &out {
        write_text(out, &format!("{markdown}\n"))?;
    }

    Ok(json!({
        "repo": repo,
        "openIssues": issues.len(),
        "out": out.map(|path| path.display().to_string()).unwrap_or_default(),
    }))
}

pub(crate) fn status_build(root: &Path, args: &Map<String, Value>) -> Result<Value, ToolError> {
    let workspace = resolve_path(root, str_arg(args, "workspace"), root.to_path_buf());
    let jobs_file = resolve_path(
        root,
        str_arg(args, "jobsFile"),
        workspace.join("cron").join("jobs.json"),
    );
    let out = resolve_path(
        root,
        str_arg(args, "out"),
        root.join("status").join("mcp-status.json"),
    );
    let live_runtime = args
        .get("liveRuntime")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let paths = BuildPaths::for_workspace(&workspace, &jobs_file);
    let mut payload = build_payload(&paths, &SystemClock);
    if !live_runtime {
        payload = sanitize_for_static_snapshot(payload);
    }

    let body = serde_json::to_string_pretty(&payload)
        .map_err(|err| ToolError::Failed(err.to_string()))?;
    write_text(&out, &format!("{body}\n"))?;

    Ok(json!({
        "out": out.display().to_string(),
        "generatedAt": payload.generated_at,
        "runtimeStatus": payload.runtime.status,
        "activeCount": payload.runtime.active_count,
        "liveRuntime": live_runtime,
    }))
}

pub(crate) fn release_extract(root: &Path, args: &Map<String, Value>) -> Result<Value, ToolError> {
    let Some(version) = str_arg(args, "version")
        .map(str::trim)
        .filter(|version| !version.is_empty())
    else {
        return Err(invalid("version is required"));
    };

    let changelog = resolve_path(root, str_arg(args, "changelog"), root.join("CHANGELOG.md"));
    let text = fs::read_to_string(&changelog)?;
    let notes =
        extract_release_notes(&text, version).map_err(|err| ToolError::Failed(err.to_string()))?;

    let out = str_arg(args, "out")
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            resolve_path(
                root,
                Some(raw),
                root.join("status").join(format!("release-notes-{version}.md")),
            )
        });
    if let Some(out) = &out {
        write_text(out, &notes)?;
    }

    let trimmed = notes.trim();
    Ok(json!({
        "version": version,
        "changelog": changelog.display().to_string(),
        "out": out.map(|path| path.display().to_string()).unwrap_or_default(),
        "lines": trimmed.lines().count(),
        "preview": trimmed.lines().take(4).collect::<Vec<_>>().join("\n"),
    }))
}

pub(crate) fn runtime_materialize(root: &Path, args: &Map<String, Value>) -> Result<Value, ToolError> {
    let events_file = resolve_path(
        root,
        str_arg(args, "eventsFile"),
        root.join("status").join("runtime-events.jsonl"),
    );
    let out = resolve_path(
        root,
        str_arg(args, "out"),
        root.join("status").join("runtime-state.json"),
    );
    let stale_ms = args
        .get("staleMs")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_STALE_MS);
    if stale_ms < 1000 {
        return Err(invalid("staleMs must be at least 1000"));
    }
    let now_ms = match args.get("nowMs") {
        Some(raw) => raw
            .as_u64()
            .filter(|now| *now > 0)
            .ok_or_else(|| invalid("nowMs must be a positive integer"))?,
        None => SystemClock.epoch_ms(),
    };

    let snapshot = cr_ledger::materialize(&events_file, &out, now_ms, stale_ms)
        .map_err(|err| ToolError::Failed(err.to_string()))?;

    Ok(json!({
        "out": out.display().to_string(),
        "revision": snapshot.revision,
        "status": snapshot.status,
        "activeCount": snapshot.active_count,
        "terminalCount": snapshot.terminal_count,
        "droppedStaleCount": snapshot.dropped_stale_count,
    }))
}
