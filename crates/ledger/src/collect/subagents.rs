// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sub-agent registry collector: started/heartbeat/terminal per run entry.

use super::{ms_field, read_json_object, str_field};
use cr_core::{
    build_event, normalize_model, normalize_thinking, EventPayload, EventType, RunKey,
    RuntimeEvent, SOURCE_SUBAGENT_REGISTRY,
};
use serde_json::Value;
use std::path::Path;

/// Emit the lifecycle triple for every registry entry with a resolvable
/// start. Entries are visited in sorted run-id order.
pub fn collect_subagent_events(subagent_file: &Path) -> Vec<RuntimeEvent> {
    let Some(doc) = read_json_object(subagent_file) else {
        return Vec::new();
    };
    let Some(Value::Object(runs)) = doc.get("runs") else {
        return Vec::new();
    };

    let mut events = Vec::new();
    for (run_id, entry) in runs {
        let Value::Object(entry) = entry else {
            continue;
        };
        let Some(run_key) = RunKey::subagent(run_id) else {
            continue;
        };
        let Some(started_at_ms) =
            ms_field(entry, "startedAt").or_else(|| ms_field(entry, "createdAt"))
        else {
            continue;
        };

        let label = str_field(entry, "label").unwrap_or("Background task").to_string();
        let session_key = str_field(entry, "childSessionKey")
            .map(str::to_string)
            .unwrap_or_else(|| format!("subagent:{run_id}"));
        let heartbeat_at_ms = ms_field(entry, "updatedAt").unwrap_or(started_at_ms);

        let payload = EventPayload {
            job_id: Some(format!("subagent:{run_id}")),
            job_name: Some(label.clone()),
            summary: Some(label),
            session_id: Some(session_key.clone()),
            session_key: Some(session_key.clone()),
            started_at_ms: Some(started_at_ms),
            last_seen_at_ms: Some(heartbeat_at_ms),
            activity_type: Some("subagent".to_string()),
            model: str_field(entry, "model")
                .or_else(|| str_field(entry, "agentModel"))
                .and_then(normalize_model),
            thinking: str_field(entry, "thinking").and_then(normalize_thinking),
            status: None,
        };

        events.push(build_event(
            run_key.clone(),
            EventType::Started,
            started_at_ms,
            SOURCE_SUBAGENT_REGISTRY,
            &format!("subagent:{run_id}:started"),
            payload.clone(),
        ));
        events.push(build_event(
            run_key.clone(),
            EventType::Heartbeat,
            heartbeat_at_ms,
            SOURCE_SUBAGENT_REGISTRY,
            &format!("subagent:{run_id}:heartbeat"),
            payload,
        ));

        if let Some(ended_at_ms) = ms_field(entry, "endedAt") {
            let terminal = str_field(entry, "status")
                .or_else(|| str_field(entry, "endStatus"))
                .map(EventType::normalize_terminal)
                .unwrap_or(EventType::Finished);
            let payload = EventPayload {
                job_id: Some(format!("subagent:{run_id}")),
                session_id: Some(session_key),
                status: Some(terminal.as_str().to_string()),
                ..EventPayload::default()
            };
            events.push(build_event(
                run_key,
                terminal,
                ended_at_ms,
                SOURCE_SUBAGENT_REGISTRY,
                &format!("subagent:{run_id}:ended"),
                payload,
            ));
        }
    }

    events
}
