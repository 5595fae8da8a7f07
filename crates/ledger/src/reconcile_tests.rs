// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::collect::ProducerPaths;
use crate::snapshot::RuntimeStatus;
use std::fs;
use tempfile::tempdir;

fn paths_in(root: &std::path::Path) -> ProducerPaths {
    ProducerPaths {
        jobs_file: root.join("jobs.json"),
        sessions_file: root.join("sessions.json"),
        runs_dir: root.join("runs"),
        subagent_file: root.join("subagent-runs.json"),
    }
}

#[test]
fn excluded_job_name_matching_is_case_insensitive() {
    assert!(is_excluded_job_name("Control Room Status Publish (every 5m)"));
    assert!(is_excluded_job_name("control room status publish"));
    assert!(!is_excluded_job_name("Morning digest"));
}

#[test]
fn missing_sessions_store_reports_degraded_idle() {
    let dir = tempdir().unwrap();
    let paths = paths_in(dir.path());

    let snapshot = reconcile_live(&paths, 1_700_000_000_000, 600_000, &[]);

    assert_eq!(snapshot.status, RuntimeStatus::Idle);
    assert_eq!(snapshot.active_count, 0);
    assert_eq!(snapshot.source, "live-reconciler");
    assert_eq!(snapshot.degraded_reason, "sessions-store-missing");
    assert_eq!(snapshot.materialized_at_ms, None);
}

#[yare::parameterized(
    invalid    = { "{not json", "sessions-store-invalid" },
    non_object = { "[1,2,3]", "sessions-store-unexpected-shape" },
)]
fn sessions_store_degradation_classification(body: &str, expected: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    fs::write(&path, body).unwrap();
    assert_eq!(sessions_store_degradation(&path), Some(expected));
}

#[test]
fn extra_degraded_tags_are_comma_joined() {
    let dir = tempdir().unwrap();
    let paths = paths_in(dir.path());

    let snapshot = reconcile_live(
        &paths,
        1_700_000_000_000,
        600_000,
        &["materialized-state-stale"],
    );
    assert_eq!(
        snapshot.degraded_reason,
        "materialized-state-stale,sessions-store-missing"
    );
}

#[test]
fn live_runs_survive_and_publisher_sessions_are_dropped() {
    let dir = tempdir().unwrap();
    let paths = paths_in(dir.path());
    let now_ms = 1_700_000_060_000u64;

    fs::write(
        &paths.jobs_file,
        r#"{"jobs":[
            {"id":"job-1","name":"Morning digest","enabled":true},
            {"id":"job-pub","name":"Control room status publish","enabled":true}
        ]}"#,
    )
    .unwrap();
    fs::write(
        &paths.sessions_file,
        format!(
            r#"{{
                "agent:main:cron:job-1:run:session-a": {{"updatedAt": {0}}},
                "agent:main:cron:job-pub:run:session-p": {{"updatedAt": {0}}}
            }}"#,
            now_ms - 30_000
        ),
    )
    .unwrap();

    let snapshot = reconcile_live(&paths, now_ms, 600_000, &[]);

    // Scenario: the publisher's own run never flags the dashboard busy.
    assert_eq!(snapshot.active_count, 1);
    assert_eq!(snapshot.active_runs[0].job_name, "Morning digest");
    assert_eq!(snapshot.status, RuntimeStatus::Running);
    assert_eq!(snapshot.degraded_reason, "");
}

#[test]
fn publisher_only_sessions_reconcile_to_idle() {
    let dir = tempdir().unwrap();
    let paths = paths_in(dir.path());
    let now_ms = 1_700_000_060_000u64;

    fs::write(
        &paths.jobs_file,
        r#"{"jobs":[{"id":"job-pub","name":"Control room status publish (gist)","enabled":true}]}"#,
    )
    .unwrap();
    fs::write(
        &paths.sessions_file,
        format!(
            r#"{{"agent:main:cron:job-pub:run:session-p": {{"updatedAt": {}}}}}"#,
            now_ms - 10_000
        ),
    )
    .unwrap();

    let snapshot = reconcile_live(&paths, now_ms, 600_000, &[]);
    assert_eq!(snapshot.status, RuntimeStatus::Idle);
    assert!(snapshot.active_runs.is_empty());
}

#[test]
fn finished_runs_do_not_reconcile_as_active() {
    let dir = tempdir().unwrap();
    let paths = paths_in(dir.path());
    let now_ms = 1_700_000_060_000u64;
    fs::create_dir_all(&paths.runs_dir).unwrap();

    fs::write(
        &paths.jobs_file,
        r#"{"jobs":[{"id":"job-1","name":"Morning digest","enabled":true}]}"#,
    )
    .unwrap();
    fs::write(
        &paths.sessions_file,
        format!(
            r#"{{"agent:main:cron:job-1:run:session-a": {{"updatedAt": {}}}}}"#,
            now_ms - 30_000
        ),
    )
    .unwrap();
    fs::write(
        paths.runs_dir.join("job-1.jsonl"),
        format!(
            "{{\"action\":\"finished\",\"sessionId\":\"session-a\",\"finishedAtMs\":{}}}\n",
            now_ms - 5_000
        ),
    )
    .unwrap();

    let snapshot = reconcile_live(&paths, now_ms, 600_000, &[]);
    assert_eq!(snapshot.status, RuntimeStatus::Idle);
    assert_eq!(snapshot.terminal_count, 1);
}
