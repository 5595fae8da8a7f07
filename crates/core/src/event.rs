// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Canonical lifecycle events for the runtime-truth ledger.
//!
//! Every producer trace is projected into this closed vocabulary before it
//! touches the journal. Event ids are content-addressed, so replaying a
//! producer artifact can never double-count an observation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fmt::Write as _;

/// Source tag emitted by the cron run-log collector.
pub const SOURCE_CRON_RUNS: &str = "cron-runs";
/// Source tag emitted by the sub-agent registry collector.
pub const SOURCE_SUBAGENT_REGISTRY: &str = "subagent-registry";
/// Source tag emitted by the sessions-store collector.
pub const SOURCE_SESSIONS_STORE: &str = "sessions-store";

/// Lifecycle event vocabulary.
///
/// Running types keep a run alive; terminal types are absorbing: once a
/// run key has folded one, later events for that key are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Started,
    Heartbeat,
    Finished,
    Failed,
    Cancelled,
    TimedOut,
    StaleExpired,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Started => "started",
            EventType::Heartbeat => "heartbeat",
            EventType::Finished => "finished",
            EventType::Failed => "failed",
            EventType::Cancelled => "cancelled",
            EventType::TimedOut => "timed_out",
            EventType::StaleExpired => "stale_expired",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, EventType::Started | EventType::Heartbeat)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventType::Finished
                | EventType::Failed
                | EventType::Cancelled
                | EventType::TimedOut
                | EventType::StaleExpired
        )
    }

    /// Parse an exact canonical label.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "started" => Some(EventType::Started),
            "heartbeat" => Some(EventType::Heartbeat),
            "finished" => Some(EventType::Finished),
            "failed" => Some(EventType::Failed),
            "cancelled" => Some(EventType::Cancelled),
            "timed_out" => Some(EventType::TimedOut),
            "stale_expired" => Some(EventType::StaleExpired),
            _ => None,
        }
    }

    /// Normalize heterogeneous terminal labels to canonical values.
    ///
    /// Unknown terminal-like labels collapse to `finished`, matching the
    /// optimistic default of every producer in the workspace.
    pub fn normalize_terminal(raw: &str) -> Self {
        let cleaned = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match cleaned.as_str() {
            "failed" | "error" | "errored" | "failure" => EventType::Failed,
            "cancelled" | "canceled" => EventType::Cancelled,
            "timed_out" | "timeout" | "timedout" => EventType::TimedOut,
            "stale_expired" => EventType::StaleExpired,
            _ => EventType::Finished,
        }
    }

    /// Project a raw producer label into the closed set.
    ///
    /// Running labels pass through verbatim; everything else goes through
    /// terminal normalization.
    pub fn from_raw_label(raw: &str) -> Self {
        match Self::parse(raw.trim()) {
            Some(parsed) if parsed.is_running() => parsed,
            _ => Self::normalize_terminal(raw),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical opaque identity for one execution across producers.
///
/// Cron runs need both a job id and a session id; unresolvable identities
/// are dropped by the constructors rather than normalized to placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunKey(String);

impl RunKey {
    pub fn cron(job_id: &str, session_id: &str) -> Option<Self> {
        if job_id.is_empty()
            || session_id.is_empty()
            || job_id.contains(':')
            || session_id.contains(':')
        {
            return None;
        }
        Some(Self(format!("cron:{job_id}:{session_id}")))
    }

    pub fn subagent(run_id: &str) -> Option<Self> {
        if run_id.is_empty() {
            return None;
        }
        Some(Self(format!("subagent:{run_id}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RunKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for RunKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Tie-break priority for the canonical replay order. Lower wins.
pub fn source_priority(source: &str) -> u8 {
    match source {
        SOURCE_CRON_RUNS => 0,
        SOURCE_SUBAGENT_REGISTRY => 1,
        SOURCE_SESSIONS_STORE => 2,
        "" => 99,
        _ => 50,
    }
}

/// Typed projection of the heterogeneous producer fields carried on an
/// event. Every field is optional; the reducer nil-coalesces across
/// observations of the same run key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One journal record. Immutable after append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeEvent {
    pub event_id: String,
    pub run_key: RunKey,
    pub event_type: EventType,
    pub event_at_ms: u64,
    pub source: String,
    pub source_offset: String,
    #[serde(default)]
    pub payload: EventPayload,
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Content-addressed identity: identical observations hash identically, so
/// duplicate collection passes are dropped at append time.
pub fn deterministic_event_id(
    run_key: &RunKey,
    event_type: EventType,
    event_at_ms: u64,
    source: &str,
    source_offset: &str,
) -> String {
    let material = format!(
        "{run_key}|{event_type}|{event_at_ms}|{source}|{source_offset}",
        event_type = event_type.as_str()
    );
    hex_digest(&Sha256::digest(material.as_bytes()))
}

/// Compose a canonical event with its deterministic id.
pub fn build_event(
    run_key: RunKey,
    event_type: EventType,
    event_at_ms: u64,
    source: &str,
    source_offset: &str,
    payload: EventPayload,
) -> RuntimeEvent {
    let event_id = deterministic_event_id(&run_key, event_type, event_at_ms, source, source_offset);
    RuntimeEvent {
        event_id,
        run_key,
        event_type,
        event_at_ms,
        source: source.to_string(),
        source_offset: source_offset.to_string(),
        payload,
    }
}

fn sort_key(event: &RuntimeEvent) -> (u64, u8, &str, &str) {
    (
        event.event_at_ms,
        source_priority(&event.source),
        event.source_offset.as_str(),
        event.event_id.as_str(),
    )
}

/// Sort into the canonical replay order:
/// `(eventAtMs, sourcePriority, sourceOffset, eventId)`.
pub fn sort_events(events: &mut [RuntimeEvent]) {
    events.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
