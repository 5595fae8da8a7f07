// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill graph: a fixed DAG derived deterministically from workspace
//! artifacts.
//!
//! The catalogue is a constant evaluated in topological order, so no
//! runtime cycles are possible. Progress comes from keyword hits over the
//! last week of memory files plus the long-lived memory file, so the same
//! artifacts always render the same graph.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const MAX_TIER: u8 = 5;
const HITS_PER_FULL_PROGRESS: f64 = 8.0;
const ACTIVE_TIER_THRESHOLD: u8 = 3;
const MEMORY_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillState {
    Active,
    Planned,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTier {
    pub title: String,
    pub definition: String,
    pub difference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    pub id: String,
    pub name: String,
    pub description: String,
    pub effect: String,
    pub state: SkillState,
    pub tier: u8,
    pub max_tier: u8,
    pub dependencies: Vec<String>,
    pub tiers: Vec<SkillTier>,
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGraph {
    pub seed: String,
    pub nodes: Vec<SkillNode>,
}

struct SkillSpec {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    effect: &'static str,
    dependencies: &'static [&'static str],
    keywords: &'static [&'static str],
    tiers: [(&'static str, &'static str, &'static str); 5],
}

/// The catalogue, in topological order of the dependency DAG.
const CATALOGUE: &[SkillSpec] = &[
    SkillSpec {
        id: "scheduling",
        name: "Scheduling",
        description: "Run work on a clock without being asked.",
        effect: "Cron jobs fire on time and reschedule themselves.",
        dependencies: &[],
        keywords: &["cron", "schedule", "scheduled", "job", "timer", "interval"],
        tiers: [
            ("One-shot", "A single timed task fires.", "From manual to timed."),
            ("Recurring", "Jobs repeat on an interval.", "No re-arming needed."),
            ("Calendared", "Jobs carry real next-run times.", "Drift is visible."),
            ("Self-healing clock", "Missed runs are detected.", "Gaps get noticed."),
            ("Load-aware", "Runs avoid colliding with each other.", "The clock yields."),
        ],
    },
    SkillSpec {
        id: "observability",
        name: "Observability",
        description: "Know what is running right now, from artifacts alone.",
        effect: "The dashboard shows live runtime truth with no flicker.",
        dependencies: &["scheduling"],
        keywords: &["status", "dashboard", "payload", "snapshot", "journal", "trend", "metric"],
        tiers: [
            ("Logged", "Work leaves a trace.", "Something to read after the fact."),
            ("Collected", "Traces fuse into one journal.", "One place to look."),
            ("Materialized", "A reducer keeps a live snapshot.", "Truth without re-scanning."),
            ("Rendered", "A payload feeds the dashboard.", "Visible at a glance."),
            ("Trended", "History becomes charts.", "Direction, not just state."),
        ],
    },
    SkillSpec {
        id: "self-healing",
        name: "Self-healing",
        description: "Detect and recover from stuck or failed runs.",
        effect: "Stale runs expire instead of haunting the dashboard.",
        dependencies: &["scheduling"],
        keywords: &["watchdog", "restart", "recover", "self-heal", "failover", "guardrail"],
        tiers: [
            ("Watched", "A watchdog observes health.", "Failure is noticed."),
            ("Alarmed", "Bad health is reported.", "Someone hears about it."),
            ("Expiring", "Stale work times out.", "No zombie runs."),
            ("Restarting", "Failed jobs retry themselves.", "Recovery without hands."),
            ("Preventive", "Guardrails trip before damage.", "Failure is avoided."),
        ],
    },
    SkillSpec {
        id: "publishing",
        name: "Publishing",
        description: "Ship status and releases to the outside world.",
        effect: "Fresh payloads and release notes leave the machine.",
        dependencies: &["observability"],
        keywords: &["publish", "gist", "release", "changelog", "tag", "version"],
        tiers: [
            ("Written", "Artifacts land on disk.", "Output exists."),
            ("Pushed", "Artifacts reach a remote.", "Others can see them."),
            ("Versioned", "Releases carry notes.", "Change is narrated."),
            ("Continuous", "Publishing runs on the clock.", "No manual step."),
            ("Self-describing", "Payloads carry their own provenance.", "Trustable output."),
        ],
    },
    SkillSpec {
        id: "orchestration",
        name: "Orchestration",
        description: "Coordinate sub-agents and pipelines.",
        effect: "Background runs are tracked from start to terminal state.",
        dependencies: &["scheduling", "observability"],
        keywords: &["subagent", "orchestrate", "pipeline", "registry", "worker", "spawn"],
        tiers: [
            ("Delegated", "One helper runs a task.", "Work leaves the main thread."),
            ("Registered", "Helpers are tracked by id.", "Nothing runs anonymously."),
            ("Supervised", "Lifecycles are journaled.", "Start and end are facts."),
            ("Fanned out", "Many helpers run at once.", "Throughput scales."),
            ("Composed", "Pipelines chain helpers.", "Workflows, not one-offs."),
        ],
    },
    SkillSpec {
        id: "autonomy",
        name: "Autonomy",
        description: "Run unattended for long stretches.",
        effect: "Overnight work completes without supervision.",
        dependencies: &["self-healing", "orchestration"],
        keywords: &["autonomous", "unattended", "overnight", "autopilot", "hands-off"],
        tiers: [
            ("Assisted", "Short tasks run alone.", "Minutes of trust."),
            ("Shift-length", "Hours pass without touch.", "An evening of trust."),
            ("Overnight", "Work survives the night.", "Sleep through it."),
            ("Recovering", "Failures self-resolve en route.", "Trust with verification."),
            ("Standing", "The system simply runs.", "Supervision is the exception."),
        ],
    },
];

fn count_hits(haystack: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .map(|keyword| haystack.matches(keyword).count())
        .sum()
}

fn hex_prefix(bytes: &[u8], chars: usize) -> String {
    let mut out = String::with_capacity(chars);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
        if out.len() >= chars {
            break;
        }
    }
    out.truncate(chars);
    out
}

/// Derive the skill graph from artifact texts.
///
/// `artifact_paths` and `today` feed the deterministic seed only.
pub fn derive_skills(artifact_texts: &[String], artifact_paths: &[String], today: &str) -> SkillGraph {
    let joined = artifact_texts.join("\n").to_lowercase();

    let mut active: BTreeSet<&str> = BTreeSet::new();
    let mut nodes = Vec::with_capacity(CATALOGUE.len());

    for spec in CATALOGUE {
        let hits = count_hits(&joined, spec.keywords);
        let progress = (hits as f64 / HITS_PER_FULL_PROGRESS).min(1.0);
        let mut tier = (progress * f64::from(MAX_TIER)).floor() as u8;
        if tier == 0 && progress > 0.0 {
            tier = 1;
        }
        tier = tier.min(MAX_TIER);

        let dependencies_met = spec
            .dependencies
            .iter()
            .all(|dependency| active.contains(dependency));
        let state = if dependencies_met && tier >= ACTIVE_TIER_THRESHOLD {
            SkillState::Active
        } else if dependencies_met && tier > 0 {
            SkillState::Planned
        } else {
            SkillState::Locked
        };
        if state == SkillState::Active {
            active.insert(spec.id);
        }

        nodes.push(SkillNode {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            effect: spec.effect.to_string(),
            state,
            tier,
            max_tier: MAX_TIER,
            dependencies: spec.dependencies.iter().map(|d| d.to_string()).collect(),
            tiers: spec
                .tiers
                .iter()
                .map(|(title, definition, difference)| SkillTier {
                    title: title.to_string(),
                    definition: definition.to_string(),
                    difference: difference.to_string(),
                })
                .collect(),
            progress,
        });
    }

    let seed_material = format!("{}|{today}", artifact_paths.join("|"));
    let seed = hex_prefix(&Sha256::digest(seed_material.as_bytes()), 12);

    SkillGraph { seed, nodes }
}

/// Gather the derivation artifacts: the last seven days of memory files
/// plus the long-lived memory file.
pub fn skill_artifacts(
    workspace: &Path,
    today: chrono::NaiveDate,
) -> (Vec<String>, Vec<String>) {
    let mut texts = Vec::new();
    let mut paths = Vec::new();

    for days_back in (0..MEMORY_WINDOW_DAYS).rev() {
        let Some(day) = today.checked_sub_days(chrono::Days::new(days_back)) else {
            continue;
        };
        let path = workspace
            .join("memory")
            .join(format!("{}.md", day.format("%Y-%m-%d")));
        if let Ok(text) = fs::read_to_string(&path) {
            paths.push(path.to_string_lossy().into_owned());
            texts.push(text);
        }
    }

    let long_lived = workspace.join("MEMORY.md");
    if let Ok(text) = fs::read_to_string(&long_lived) {
        paths.push(long_lived.to_string_lossy().into_owned());
        texts.push(text);
    }

    (texts, paths)
}

#[cfg(test)]
#[path = "skills_tests.rs"]
mod tests;
