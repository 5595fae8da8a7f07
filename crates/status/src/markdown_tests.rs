// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn plan_blocks_require_the_em_dash() {
    let markdown = "\
### 08:00-09:00 — Morning triage
### 09:00-10:00 - Hyphen separator, skipped
### 10:00 — No range, skipped
## 11:00-12:00 — Wrong heading level, skipped
###11:00-12:00 — No space, skipped
### 13:00-14:00 — Publish status refresh
";
    let blocks = parse_plan_blocks(markdown);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].time, "08:00-09:00");
    assert_eq!(blocks[0].task, "Morning triage");
    assert_eq!(blocks[1].task, "Publish status refresh");
}

#[test]
fn plan_blocks_keep_shaped_but_invalid_ranges() {
    // Shape is enough at parse time; validation happens when slicing.
    let blocks = parse_plan_blocks("### 25:00-26:00 — Impossible\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].time, "25:00-26:00");
}

#[test]
fn today_status_fields_survive_absence() {
    let fields = parse_today_status("# Today\n\nNothing structured here.\n");
    assert_eq!(fields.current_focus, "");
    assert_eq!(fields.active_work, "");
}

#[test]
fn today_status_fields_are_extracted() {
    let fields = parse_today_status(
        "\
- Primary focus: Ship the reducer
- Running now: 09:00-11:30 — Deep work
- Unrelated: ignored
",
    );
    assert_eq!(fields.current_focus, "Ship the reducer");
    assert_eq!(fields.active_work, "09:00-11:30 — Deep work");
}

#[test]
fn section_bullets_stop_at_the_next_heading() {
    let markdown = "\
## Now
- current thing
- another thing

## Next 3 meaningful blocks
- later thing
- final thing

## Done
- done thing
";
    let now = parse_section_bullets(markdown, "Now");
    assert_eq!(now, vec!["current thing", "another thing"]);

    // Section-name matching is case-insensitive.
    let next = parse_section_bullets(markdown, "next 3 meaningful blocks");
    assert_eq!(next, vec!["later thing", "final thing"]);

    assert!(parse_section_bullets(markdown, "Missing").is_empty());
}
