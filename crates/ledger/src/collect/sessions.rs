// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sessions-store collector: heartbeats for in-flight cron run sessions.

use super::{ms_field, read_json_object, str_field};
use crate::scheduler::JobCatalog;
use cr_core::{
    build_event, normalize_model, normalize_thinking, EventPayload, EventType, RunKey,
    RuntimeEvent, SOURCE_SESSIONS_STORE,
};
use serde_json::Value;
use std::path::Path;

const CRON_RUN_KEY_PREFIX: &str = "agent:main:cron:";
const CRON_RUN_KEY_MARKER: &str = ":run:";

/// Split `agent:main:cron:<jobId>:run:<sessionId>`.
///
/// Both segments must be single path components; anything else is not a
/// cron run session.
pub fn parse_cron_run_session_key(session_key: &str) -> Option<(&str, &str)> {
    let rest = session_key.strip_prefix(CRON_RUN_KEY_PREFIX)?;
    let (job_id, session_id) = rest.split_once(CRON_RUN_KEY_MARKER)?;
    if job_id.is_empty()
        || session_id.is_empty()
        || job_id.contains(':')
        || session_id.contains(':')
    {
        return None;
    }
    Some((job_id, session_id))
}

/// One `heartbeat` per matching session entry, stamped at `updatedAt`.
pub fn collect_session_events(sessions_file: &Path, jobs: &JobCatalog) -> Vec<RuntimeEvent> {
    let Some(doc) = read_json_object(sessions_file) else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for (session_key, meta) in &doc {
        let Value::Object(meta) = meta else {
            continue;
        };
        let Some((job_id, session_id)) = parse_cron_run_session_key(session_key) else {
            continue;
        };
        let Some(run_key) = RunKey::cron(job_id, session_id) else {
            continue;
        };
        let Some(event_at_ms) = ms_field(meta, "updatedAt") else {
            continue;
        };

        let job_meta = jobs.get(job_id);
        let job_name = jobs.name_for(job_id);
        let session_model = str_field(meta, "model").and_then(normalize_model);
        let session_thinking = str_field(meta, "thinking").and_then(normalize_thinking);

        let payload = EventPayload {
            job_id: Some(job_id.to_string()),
            job_name: Some(job_name.clone()),
            session_id: Some(session_id.to_string()),
            session_key: Some(session_key.clone()),
            summary: Some(job_name),
            started_at_ms: Some(event_at_ms),
            last_seen_at_ms: Some(event_at_ms),
            activity_type: Some("cron".to_string()),
            model: session_model.or_else(|| job_meta.and_then(|meta| meta.model.clone())),
            thinking: session_thinking.or_else(|| job_meta.and_then(|meta| meta.thinking.clone())),
            status: None,
        };

        events.push(build_event(
            run_key,
            EventType::Heartbeat,
            event_at_ms,
            SOURCE_SESSIONS_STORE,
            &format!("sessions:{session_key}"),
            payload,
        ));
    }

    events
}
