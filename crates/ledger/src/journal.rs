// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only newline-delimited event journal.
//!
//! Writers open in append mode and emit whole lines, so cross-process
//! contention never interleaves records. Duplicate observations are dropped
//! by id at append time, which makes collection idempotent.

use cr_core::{sort_events, RuntimeEvent};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal io: {0}")]
    Io(#[from] std::io::Error),
    #[error("journal encode: {0}")]
    Encode(#[from] serde_json::Error),
}

pub struct Journal {
    path: PathBuf,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every parseable record, canonically sorted.
    ///
    /// A missing file reads as empty; malformed lines are skipped at record
    /// granularity.
    pub fn read_events(&self) -> Vec<RuntimeEvent> {
        let Ok(text) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        let mut events: Vec<RuntimeEvent> = text
            .lines()
            .filter_map(|raw| {
                let line = raw.trim();
                if line.is_empty() {
                    return None;
                }
                serde_json::from_str(line).ok()
            })
            .collect();
        sort_events(&mut events);
        events
    }

    /// Every event id present in the file.
    ///
    /// Scans at the JSON level so ids survive even on rows the typed parser
    /// would reject.
    pub fn existing_ids(&self) -> HashSet<String> {
        let Ok(text) = fs::read_to_string(&self.path) else {
            return HashSet::new();
        };
        let mut ids = HashSet::new();
        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Ok(Value::Object(row)) = serde_json::from_str::<Value>(line) else {
                continue;
            };
            if let Some(event_id) = row.get("eventId").and_then(Value::as_str) {
                if !event_id.is_empty() {
                    ids.insert(event_id.to_string());
                }
            }
        }
        ids
    }

    /// Append events whose ids are not yet present; returns appended count.
    pub fn append_new(&self, events: &[RuntimeEvent]) -> Result<usize, JournalError> {
        let mut seen = self.existing_ids();
        let mut fresh = Vec::new();
        for event in events {
            if event.event_id.is_empty() || seen.contains(&event.event_id) {
                continue;
            }
            seen.insert(event.event_id.clone());
            fresh.push(event);
        }

        if fresh.is_empty() {
            return Ok(0);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        for event in &fresh {
            let mut line = serde_json::to_string(event)?;
            line.push('\n');
            file.write_all(line.as_bytes())?;
        }

        debug!(appended = fresh.len(), path = %self.path.display(), "journal append");
        Ok(fresh.len())
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
