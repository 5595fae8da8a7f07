// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Semantic dedupe for the next lane.
//!
//! Timeline-derived items are canonical; status-file bullets that restate
//! the same block (with looser wording or a shifted time) must not appear
//! twice.

use crate::timegrid::{blank_time_ranges, parse_time_range, TimeRange};
use std::collections::BTreeSet;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "at", "by", "for", "from", "in", "into", "of", "on", "over", "the", "to",
    "under", "via", "with",
];

const TIME_GRACE_MINUTES: u32 = 5;
const SIMILARITY_THRESHOLD: f64 = 0.6;
const STRONG_SIMILARITY_THRESHOLD: f64 = 0.85;
const MIN_TOKEN_OVERLAP: usize = 2;
const OVERLAP_RATIO_THRESHOLD: f64 = 0.3;

struct ItemMeta {
    range: Option<TimeRange>,
    normalized: String,
    tokens: BTreeSet<String>,
}

fn word_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            current.push(ch);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn meta_for(item: &str) -> ItemMeta {
    let cleaned = blank_time_ranges(item);
    let words = word_tokens(&cleaned);
    let normalized = words.join(" ");
    let tokens = words
        .into_iter()
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .collect();
    ItemMeta {
        range: parse_time_range(item),
        normalized,
        tokens,
    }
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn overlap_ratio(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let overlap = a.intersection(b).count();
    overlap as f64 / a.len().min(b.len()) as f64
}

fn has_meaningful_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    let overlap = a.intersection(b).count();
    overlap >= MIN_TOKEN_OVERLAP && overlap_ratio(a, b) >= OVERLAP_RATIO_THRESHOLD
}

fn ranges_overlap_or_close(a: TimeRange, b: TimeRange) -> bool {
    a.start <= b.end + TIME_GRACE_MINUTES && b.start <= a.end + TIME_GRACE_MINUTES
}

fn is_semantic_match(candidate: &ItemMeta, existing: &ItemMeta, threshold: f64) -> bool {
    if !candidate.normalized.is_empty() && candidate.normalized == existing.normalized {
        return true;
    }
    if candidate.tokens.len() < 2 || existing.tokens.len() < 2 {
        return false;
    }
    if jaccard(&candidate.tokens, &existing.tokens) >= threshold {
        return true;
    }
    let overlap = candidate.tokens.intersection(&existing.tokens).count();
    if overlap >= MIN_TOKEN_OVERLAP {
        return candidate.tokens.is_subset(&existing.tokens)
            || existing.tokens.is_subset(&candidate.tokens);
    }
    false
}

fn is_duplicate(candidate: &ItemMeta, existing_items: &[ItemMeta]) -> bool {
    for existing in existing_items {
        if !candidate.normalized.is_empty() && candidate.normalized == existing.normalized {
            return true;
        }

        if let (Some(range_a), Some(range_b)) = (candidate.range, existing.range) {
            if !ranges_overlap_or_close(range_a, range_b) {
                continue;
            }
            if is_semantic_match(candidate, existing, SIMILARITY_THRESHOLD) {
                return true;
            }
            if has_meaningful_overlap(&candidate.tokens, &existing.tokens) {
                return true;
            }
            continue;
        }

        if is_semantic_match(candidate, existing, STRONG_SIMILARITY_THRESHOLD) {
            return true;
        }
    }
    false
}

/// Merge status-file next items into the canonical timeline-derived list,
/// dropping semantic restatements.
pub fn dedupe_next_lane(timeline_items: &[String], status_items: &[String]) -> Vec<String> {
    let mut deduped: Vec<String> = timeline_items.to_vec();
    let mut seen: Vec<ItemMeta> = timeline_items.iter().map(|item| meta_for(item)).collect();

    for item in status_items {
        let meta = meta_for(item);
        if is_duplicate(&meta, &seen) {
            continue;
        }
        deduped.push(item.clone());
        seen.push(meta);
    }

    deduped
}

#[cfg(test)]
#[path = "dedupe_tests.rs"]
mod tests;
