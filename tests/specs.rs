// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace-level end-to-end scenarios driven through the `cr` binary.

use assert_cmd::Command;
use cr_core::{build_event, Clock, EventPayload, EventType, RunKey, SystemClock};
use serde_json::{json, Value};
use serial_test::serial;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cr() -> Command {
    Command::cargo_bin("cr").expect("cr binary builds")
}

fn stdout_of(output: std::process::Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 stdout")
}

fn write_journal(path: &Path, events: &[cr_core::RuntimeEvent]) {
    let mut body = String::new();
    for event in events {
        body.push_str(&serde_json::to_string(event).expect("event encodes"));
        body.push('\n');
    }
    fs::write(path, body).expect("journal writes");
}

fn cron_started(job: &str, session: &str, at_ms: u64) -> cr_core::RuntimeEvent {
    build_event(
        RunKey::cron(job, session).expect("valid run key"),
        EventType::Started,
        at_ms,
        "sessions-store",
        &format!("sessions:{job}:{session}"),
        EventPayload {
            job_id: Some(job.to_string()),
            job_name: Some(format!("Job {job}")),
            session_id: Some(session.to_string()),
            summary: Some(format!("Job {job}")),
            started_at_ms: Some(at_ms),
            last_seen_at_ms: Some(at_ms),
            activity_type: Some("cron".to_string()),
            ..EventPayload::default()
        },
    )
}

fn cron_finished(job: &str, session: &str, at_ms: u64) -> cr_core::RuntimeEvent {
    build_event(
        RunKey::cron(job, session).expect("valid run key"),
        EventType::Finished,
        at_ms,
        "cron-runs",
        &format!("{job}.jsonl:1"),
        EventPayload {
            job_id: Some(job.to_string()),
            session_id: Some(session.to_string()),
            status: Some("finished".to_string()),
            ..EventPayload::default()
        },
    )
}

#[test]
fn materialize_start_then_finish_leaves_no_active_rows() {
    let dir = tempdir().expect("tempdir");
    let events_file = dir.path().join("runtime-events.jsonl");
    let out = dir.path().join("runtime-state.json");

    let now_ms = SystemClock.epoch_ms();
    write_journal(
        &events_file,
        &[
            cron_started("job-1", "session-a", now_ms - 30_000),
            cron_finished("job-1", "session-a", now_ms - 20_000),
        ],
    );

    let output = cr()
        .args([
            "materialize-runtime-state",
            "--events-file",
            &events_file.to_string_lossy(),
            "--out",
            &out.to_string_lossy(),
            "--stale-ms",
            "60000",
        ])
        .output()
        .expect("spawn");
    let stdout = stdout_of(output);
    assert_eq!(
        stdout.trim(),
        "runtime materialized: revision=rtv1-00000001 active=0 terminals=1"
    );

    let snapshot = cr_ledger::read_snapshot(&out).expect("snapshot parses");
    assert_eq!(snapshot.status, cr_ledger::RuntimeStatus::Idle);
    assert_eq!(snapshot.terminal_count, 1);
    assert_eq!(snapshot.dropped_stale_count, 0);
}

#[test]
fn materialize_expires_stale_lone_start() {
    let dir = tempdir().expect("tempdir");
    let events_file = dir.path().join("runtime-events.jsonl");
    let out = dir.path().join("runtime-state.json");

    let now_ms = SystemClock.epoch_ms();
    write_journal(
        &events_file,
        &[cron_started("job-1", "session-a", now_ms - 200_000)],
    );

    let output = cr()
        .args([
            "materialize-runtime-state",
            "--events-file",
            &events_file.to_string_lossy(),
            "--out",
            &out.to_string_lossy(),
            "--stale-ms",
            "60000",
        ])
        .output()
        .expect("spawn");
    let stdout = stdout_of(output);
    assert!(stdout.contains("active=0"));
    assert!(stdout.contains("terminals=1"));

    let snapshot: Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("snapshot readable"))
            .expect("snapshot parses");
    assert_eq!(snapshot["droppedStaleCount"], json!(1));
}

#[test]
fn successive_materializations_advance_the_revision() {
    let dir = tempdir().expect("tempdir");
    let events_file = dir.path().join("runtime-events.jsonl");
    let out = dir.path().join("runtime-state.json");

    let now_ms = SystemClock.epoch_ms();
    write_journal(&events_file, &[cron_started("job-1", "s", now_ms - 5_000)]);

    let args = [
        "materialize-runtime-state".to_string(),
        "--events-file".to_string(),
        events_file.to_string_lossy().into_owned(),
        "--out".to_string(),
        out.to_string_lossy().into_owned(),
    ];
    let first = stdout_of(cr().args(&args).output().expect("spawn"));
    let second = stdout_of(cr().args(&args).output().expect("spawn"));

    assert!(first.contains("revision=rtv1-00000001"));
    assert!(second.contains("revision=rtv1-00000002"));
}

#[test]
#[serial]
fn collect_is_idempotent_across_runs() {
    let dir = tempdir().expect("tempdir");
    let root = dir.path();
    let jobs_file = root.join("jobs.json");
    let sessions_file = root.join("sessions.json");
    let runs_dir = root.join("runs");
    let subagent_file = root.join("subagent-runs.json");
    let events_file = root.join("runtime-events.jsonl");
    fs::create_dir_all(&runs_dir).expect("runs dir");

    let now_ms = SystemClock.epoch_ms();
    fs::write(
        &jobs_file,
        r#"{"jobs":[{"id":"job-1","name":"Job One","enabled":true}]}"#,
    )
    .expect("jobs file");
    fs::write(
        &sessions_file,
        format!(
            r#"{{"agent:main:cron:job-1:run:session-a": {{"updatedAt": {}}}}}"#,
            now_ms - 10_000
        ),
    )
    .expect("sessions file");
    fs::write(
        &subagent_file,
        format!(
            r#"{{"runs":{{"run-1":{{"startedAt":{},"label":"Background sweep"}}}}}}"#,
            now_ms - 20_000
        ),
    )
    .expect("subagent file");

    let args = [
        "collect-runtime-events".to_string(),
        "--jobs-file".to_string(),
        jobs_file.to_string_lossy().into_owned(),
        "--sessions-file".to_string(),
        sessions_file.to_string_lossy().into_owned(),
        "--runs-dir".to_string(),
        runs_dir.to_string_lossy().into_owned(),
        "--subagent-file".to_string(),
        subagent_file.to_string_lossy().into_owned(),
        "--events-file".to_string(),
        events_file.to_string_lossy().into_owned(),
    ];

    let first = stdout_of(cr().args(&args).output().expect("spawn"));
    assert_eq!(first.trim(), "runtime events: collected=3 appended=3");

    let second = stdout_of(cr().args(&args).output().expect("spawn"));
    assert_eq!(second.trim(), "runtime events: collected=3 appended=0");

    // The collected journal materializes into two active runs.
    let out = root.join("runtime-state.json");
    let output = cr()
        .args([
            "materialize-runtime-state",
            "--events-file",
            &events_file.to_string_lossy(),
            "--out",
            &out.to_string_lossy(),
        ])
        .output()
        .expect("spawn");
    assert!(stdout_of(output).contains("active=2"));
}

#[test]
fn extract_release_notes_prints_the_section_or_exits_one() {
    let dir = tempdir().expect("tempdir");
    let changelog = dir.path().join("CHANGELOG.md");
    fs::write(
        &changelog,
        "# Changelog\n\n## v1.4.38\n\n- reducer hardening\n\n## v1.4.37\n\n- older\n",
    )
    .expect("changelog");

    let output = cr()
        .args([
            "extract-release-notes",
            "--version",
            "1.4.38",
            "--changelog",
            &changelog.to_string_lossy(),
        ])
        .output()
        .expect("spawn");
    let stdout = stdout_of(output);
    assert!(stdout.starts_with("## v1.4.38"));
    assert!(stdout.contains("reducer hardening"));
    assert!(!stdout.contains("older"));

    let missing = cr()
        .args([
            "extract-release-notes",
            "--version",
            "9.9.9",
            "--changelog",
            &changelog.to_string_lossy(),
        ])
        .output()
        .expect("spawn");
    assert_eq!(missing.status.code(), Some(1));
}

#[test]
fn build_status_json_renders_a_payload_for_a_minimal_workspace() {
    let dir = tempdir().expect("tempdir");
    let workspace = dir.path().join("workspace");
    fs::create_dir_all(&workspace).expect("workspace");
    fs::write(
        workspace.join("DAILY_PLAN.md"),
        "### 00:00-23:59 — All-day coverage\n",
    )
    .expect("plan");
    fs::write(
        workspace.join("TODAY_STATUS.md"),
        "- Primary focus: Ledger hardening\n",
    )
    .expect("status");
    let jobs_file = workspace.join("cron").join("jobs.json");
    fs::create_dir_all(jobs_file.parent().expect("parent")).expect("cron dir");
    fs::write(&jobs_file, r#"{"jobs":[]}"#).expect("jobs");

    let out = dir.path().join("status.json");
    let output = cr()
        .args([
            "build-status-json",
            "--workspace",
            &workspace.to_string_lossy(),
            "--jobs-file",
            &jobs_file.to_string_lossy(),
            "--out",
            &out.to_string_lossy(),
        ])
        .output()
        .expect("spawn");
    stdout_of(output);

    let payload: Value = serde_json::from_str(&fs::read_to_string(&out).expect("payload file"))
        .expect("payload parses");
    assert_eq!(payload["currentFocus"], json!("Ledger hardening"));
    assert_eq!(payload["runtime"]["snapshotMode"], json!("live"));
    assert!(payload["workstream"]["now"].is_array());
    assert!(payload["skills"]["nodes"].as_array().expect("nodes").len() == 6);
}

// --- MCP flow ---

fn frame(payload: &Value) -> Vec<u8> {
    let body = serde_json::to_vec(payload).expect("body encodes");
    let mut out = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    out.extend(body);
    out
}

fn read_frames(mut bytes: &[u8]) -> Vec<Value> {
    let mut frames = Vec::new();
    while !bytes.is_empty() {
        let header_end = bytes
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
            .expect("header terminator");
        let headers = std::str::from_utf8(&bytes[..header_end]).expect("ascii headers");
        let length: usize = headers
            .lines()
            .find_map(|line| line.strip_prefix("Content-Length:"))
            .expect("content-length header")
            .trim()
            .parse()
            .expect("numeric length");
        let body_start = header_end + 4;
        let body = &bytes[body_start..body_start + length];
        frames.push(serde_json::from_slice(body).expect("frame body parses"));
        bytes = &bytes[body_start + length..];
    }
    frames
}

#[test]
#[serial]
fn mcp_server_speaks_the_documented_flow() {
    let dir = tempdir().expect("tempdir");
    let events_file = dir.path().join("runtime-events.jsonl");
    let runtime_out = dir.path().join("runtime-state.json");

    let now_ms = SystemClock.epoch_ms();
    write_journal(
        &events_file,
        &[cron_started("demo-job", "session-1", now_ms - 15_000)],
    );

    let mut input = Vec::new();
    input.extend(frame(&json!({
        "jsonrpc": "2.0", "id": 1, "method": "initialize",
        "params": {"protocolVersion": "2025-03-26", "capabilities": {"tools": {}},
                   "clientInfo": {"name": "spec-flow", "version": "0.1.0"}},
    })));
    input.extend(frame(&json!({
        "jsonrpc": "2.0", "method": "notifications/initialized", "params": {},
    })));
    input.extend(frame(&json!({
        "jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {},
    })));
    input.extend(frame(&json!({
        "jsonrpc": "2.0", "id": 3, "method": "tools/call",
        "params": {"name": "runtime.materialize", "arguments": {
            "eventsFile": events_file.to_string_lossy(),
            "out": runtime_out.to_string_lossy(),
            "nowMs": now_ms,
        }},
    })));
    input.extend(frame(&json!({
        "jsonrpc": "2.0", "id": 4, "method": "shutdown", "params": {},
    })));

    let output = cr()
        .arg("mcp-server")
        .write_stdin(input)
        .output()
        .expect("spawn");
    assert!(output.status.success());

    let frames = read_frames(&output.stdout);
    assert_eq!(frames.len(), 4);

    assert_eq!(frames[0]["result"]["protocolVersion"], json!("2025-03-26"));
    let tools: Vec<&str> = frames[1]["result"]["tools"]
        .as_array()
        .expect("tool list")
        .iter()
        .filter_map(|tool| tool["name"].as_str())
        .collect();
    assert!(tools.contains(&"runtime.materialize"));

    let call = &frames[2]["result"]["structuredContent"];
    assert_eq!(call["ok"], json!(true));
    assert_eq!(call["result"]["activeCount"], json!(1));
    assert_eq!(call["result"]["revision"], json!("rtv1-00000001"));
    assert!(runtime_out.exists());

    assert_eq!(frames[3]["result"], json!({}));
}

#[test]
fn mcp_server_exits_nonzero_on_bad_framing() {
    let output = cr()
        .arg("mcp-server")
        .write_stdin(b"no headers here\r\n\r\n".to_vec())
        .output()
        .expect("spawn");
    assert_eq!(output.status.code(), Some(1));
}
