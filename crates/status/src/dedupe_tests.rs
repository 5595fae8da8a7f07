// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn lane(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn exact_restatement_is_dropped() {
    let timeline = lane(&["13:00-14:00 — Publish status refresh"]);
    let status = lane(&["13:00-14:00 — Publish status refresh"]);
    assert_eq!(
        dedupe_next_lane(&timeline, &status),
        lane(&["13:00-14:00 — Publish status refresh"])
    );
}

#[test]
fn reworded_item_with_overlapping_time_is_dropped() {
    let timeline = lane(&["13:00-14:00 — Publish status refresh"]);
    let status = lane(&["13:05-14:00 publish the status refresh job"]);
    assert_eq!(dedupe_next_lane(&timeline, &status).len(), 1);
}

#[test]
fn identical_wording_dedupes_even_across_times() {
    // Normalization blanks the time range, so the same task text at a
    // different hour is still one item.
    let timeline = lane(&["09:00-09:30 — Queue review"]);
    let status = lane(&["18:00-18:30 — Queue review"]);
    assert_eq!(dedupe_next_lane(&timeline, &status).len(), 1);
}

#[test]
fn different_tasks_with_nearby_times_survive() {
    let timeline = lane(&["09:00-09:30 — Queue review"]);
    let status = lane(&["09:30-10:00 — Inbox sweep and replies"]);
    assert_eq!(dedupe_next_lane(&timeline, &status).len(), 2);
}

#[test]
fn unrelated_untimed_item_survives() {
    let timeline = lane(&["13:00-14:00 — Publish status refresh"]);
    let status = lane(&["Write the changelog entry"]);
    assert_eq!(
        dedupe_next_lane(&timeline, &status),
        lane(&[
            "13:00-14:00 — Publish status refresh",
            "Write the changelog entry"
        ])
    );
}

#[test]
fn untimed_subset_restatement_is_dropped() {
    let timeline = lane(&["Publish status refresh and gist update"]);
    let status = lane(&["publish status refresh"]);
    assert_eq!(dedupe_next_lane(&timeline, &status).len(), 1);
}

#[test]
fn empty_timeline_keeps_status_items() {
    let status = lane(&["one", "two"]);
    assert_eq!(dedupe_next_lane(&[], &status), lane(&["one", "two"]));
}
