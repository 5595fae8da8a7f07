// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler jobs-file model shared by the collector, the live
//! reconciler, and the payload builder.

use cr_core::{normalize_model, normalize_thinking};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobsFile {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub enabled: bool,
    pub payload: Option<JobPayload>,
    pub state: Option<JobState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobPayload {
    pub model: Option<String>,
    pub thinking: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobState {
    pub next_run_at_ms: Option<u64>,
    pub last_run_at_ms: Option<u64>,
    pub last_status: Option<String>,
}

impl JobsFile {
    /// Load, tolerating a missing or malformed file as empty.
    pub fn load(path: &Path) -> Self {
        let Ok(text) = fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&text).unwrap_or_default()
    }
}

impl JobRecord {
    pub fn next_run_at_ms(&self) -> Option<u64> {
        self.state.as_ref().and_then(|state| state.next_run_at_ms)
    }

    pub fn last_run_at_ms(&self) -> Option<u64> {
        self.state.as_ref().and_then(|state| state.last_run_at_ms)
    }

    pub fn last_status(&self) -> Option<&str> {
        self.state.as_ref().and_then(|state| state.last_status.as_deref())
    }
}

/// Job metadata resolved for event payload enrichment.
#[derive(Debug, Clone)]
pub struct JobMeta {
    pub name: String,
    pub model: Option<String>,
    pub thinking: Option<String>,
}

/// Id-indexed job lookup with `Unknown job (…)` name synthesis.
#[derive(Debug, Default)]
pub struct JobCatalog {
    by_id: HashMap<String, JobMeta>,
}

impl JobCatalog {
    pub fn from_file(doc: &JobsFile) -> Self {
        let mut by_id = HashMap::new();
        for job in &doc.jobs {
            let Some(id) = job.id.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };
            let name = job
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| synthesized_job_name(id));
            let payload = job.payload.clone().unwrap_or_default();
            by_id.insert(
                id.to_string(),
                JobMeta {
                    name,
                    model: payload.model.as_deref().and_then(normalize_model),
                    thinking: payload.thinking.as_deref().and_then(normalize_thinking),
                },
            );
        }
        Self { by_id }
    }

    pub fn load(path: &Path) -> Self {
        Self::from_file(&JobsFile::load(path))
    }

    pub fn get(&self, job_id: &str) -> Option<&JobMeta> {
        self.by_id.get(job_id)
    }

    pub fn name_for(&self, job_id: &str) -> String {
        self.get(job_id)
            .map(|meta| meta.name.clone())
            .unwrap_or_else(|| synthesized_job_name(job_id))
    }
}

/// `Unknown job (<first-8>)` fallback used wherever a job id has no record.
pub fn synthesized_job_name(job_id: &str) -> String {
    let prefix: String = job_id.chars().take(8).collect();
    format!("Unknown job ({prefix})")
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
