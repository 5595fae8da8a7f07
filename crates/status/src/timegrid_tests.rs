// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    simple       = { "09:15", Some(555) },
    one_digit    = { "9:15", Some(555) },
    midnight     = { "0:00", Some(0) },
    last_minute  = { "23:59", Some(1439) },
    hour_too_big = { "24:00", None },
    minute_big   = { "10:60", None },
    trailing     = { "09:15 standup", None },
    not_a_clock  = { "soon", None },
)]
fn hhmm_parsing(raw: &str, expected: Option<u32>) {
    assert_eq!(parse_hhmm_to_minutes(raw), expected);
}

#[test]
fn range_is_found_anywhere_in_text() {
    let range = parse_time_range("finish the 09:00-10:30 deep work block").unwrap();
    assert_eq!(range.start, 540);
    assert_eq!(range.end, 630);
}

#[test]
fn range_inside_longer_number_matches_like_a_digit_scan() {
    // In "123:45-6:78" the scan locks on to "23:45" but 6:78 fails validation.
    assert_eq!(parse_time_range("123:45-6:78"), None);
    // "123:45-6:58" validates as 23:45-6:58.
    let range = parse_time_range("123:45-6:58").unwrap();
    assert_eq!(range.start, 23 * 60 + 45);
    assert_eq!(range.end, 6 * 60 + 58);
}

#[test]
fn invalid_shaped_range_is_rejected_outright() {
    assert_eq!(parse_time_range("25:00-26:00 block"), None);
    assert_eq!(parse_time_range("no times here"), None);
}

#[test]
fn leading_clock_requires_position_zero() {
    assert_eq!(leading_clock_minutes("09:15 standup"), Some(555));
    assert_eq!(leading_clock_minutes("at 09:15"), None);
    assert_eq!(leading_clock_minutes("25:00 nope"), None);
    assert_eq!(leading_clock_text("9:15 standup"), Some("9:15"));
}

#[test]
fn is_clock_requires_full_match() {
    assert!(is_clock("09:15"));
    assert!(is_clock("9:15"));
    assert!(!is_clock("09:15 "));
    assert!(!is_clock("0915"));
}

#[test]
fn strip_removes_only_the_first_range() {
    assert_eq!(
        strip_first_time_range("09:00-10:30 — deep work"),
        " — deep work"
    );
    assert_eq!(strip_first_time_range("no range"), "no range");
}

#[test]
fn blank_replaces_every_range_with_a_space() {
    assert_eq!(
        blank_time_ranges("a 09:00-10:30 b 11:00-12:00 c"),
        "a   b   c"
    );
}
