// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn integer_milliseconds_pass_through() {
    assert_eq!(parse_timestamp_ms(&json!(1_700_000_000_000u64)), Some(1_700_000_000_000));
}

#[test]
fn integer_seconds_are_scaled() {
    assert_eq!(parse_timestamp_ms(&json!(1_700_000_000u64)), Some(1_700_000_000_000));
}

#[test]
fn zero_and_negative_are_rejected() {
    assert_eq!(parse_timestamp_ms(&json!(0)), None);
    assert_eq!(parse_timestamp_ms(&json!(-5)), None);
}

#[test]
fn iso_with_zulu_suffix() {
    assert_eq!(
        parse_timestamp_ms(&json!("2023-11-14T22:13:20Z")),
        Some(1_700_000_000_000)
    );
}

#[test]
fn iso_with_explicit_offset() {
    assert_eq!(
        parse_timestamp_ms(&json!("2023-11-14T23:13:20+01:00")),
        Some(1_700_000_000_000)
    );
}

#[test]
fn naive_datetime_is_utc() {
    assert_eq!(
        parse_timestamp_ms(&json!("2023-11-14T22:13:20")),
        Some(1_700_000_000_000)
    );
}

#[yare::parameterized(
    garbage     = { json!("not a timestamp") },
    empty       = { json!("") },
    whitespace  = { json!("   ") },
    null        = { json!(null) },
    object      = { json!({"ts": 5}) },
    bool_value  = { json!(true) },
)]
fn unparseable_values_are_dropped(value: serde_json::Value) {
    assert_eq!(parse_timestamp_ms(&value), None);
}
