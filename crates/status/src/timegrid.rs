// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock and time-range scanning over free-form markdown text.
//!
//! The plan and status files carry `HH:MM` and `HH:MM-HH:MM` fragments in
//! arbitrary positions; this module is the single scanner for them.

use std::ops::Range;

/// A time range in minutes of the local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: u32,
    pub end: u32,
}

/// Parse a bare `H:MM`/`HH:MM` string into minutes of day.
///
/// Hours above 23 and minutes above 59 are rejected.
pub fn parse_hhmm_to_minutes(value: &str) -> Option<u32> {
    let (len, hour, minute) = match_clock_at(value.as_bytes(), 0)?;
    if len != value.len() {
        return None;
    }
    validate_clock(hour, minute)
}

fn validate_clock(hour: u32, minute: u32) -> Option<u32> {
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Match `D{1,2}:DD` at a byte offset; returns `(len, hour, minute)`.
///
/// Shape only; range validation is the caller's concern, matching how a
/// digit-pattern search behaves on text like `25:99`.
fn match_clock_at(bytes: &[u8], at: usize) -> Option<(usize, u32, u32)> {
    for hour_len in [2usize, 1] {
        if at + hour_len + 3 > bytes.len() {
            continue;
        }
        let hour_digits = &bytes[at..at + hour_len];
        if !hour_digits.iter().all(u8::is_ascii_digit) {
            continue;
        }
        if bytes[at + hour_len] != b':' {
            continue;
        }
        let m0 = bytes[at + hour_len + 1];
        let m1 = bytes[at + hour_len + 2];
        if !m0.is_ascii_digit() || !m1.is_ascii_digit() {
            continue;
        }
        let hour = hour_digits
            .iter()
            .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));
        let minute = u32::from(m0 - b'0') * 10 + u32::from(m1 - b'0');
        return Some((hour_len + 3, hour, minute));
    }
    None
}

fn match_range_at(bytes: &[u8], at: usize) -> Option<(usize, (u32, u32), (u32, u32))> {
    let (start_len, start_hour, start_minute) = match_clock_at(bytes, at)?;
    if bytes.get(at + start_len) != Some(&b'-') {
        return None;
    }
    let (end_len, end_hour, end_minute) = match_clock_at(bytes, at + start_len + 1)?;
    Some((
        start_len + 1 + end_len,
        (start_hour, start_minute),
        (end_hour, end_minute),
    ))
}

/// Find the first `HH:MM-HH:MM` shaped span anywhere in the text.
pub fn find_time_range_span(text: &str) -> Option<(Range<usize>, (u32, u32), (u32, u32))> {
    let bytes = text.as_bytes();
    for at in 0..bytes.len() {
        if let Some((len, start, end)) = match_range_at(bytes, at) {
            return Some((at..at + len, start, end));
        }
    }
    None
}

/// First time range in the text, validated. A shaped-but-invalid range
/// (`25:00-26:00`) yields `None`: the fragment is not a usable time.
pub fn parse_time_range(text: &str) -> Option<TimeRange> {
    let (_, (start_hour, start_minute), (end_hour, end_minute)) = find_time_range_span(text)?;
    let start = validate_clock(start_hour, start_minute)?;
    let end = validate_clock(end_hour, end_minute)?;
    Some(TimeRange { start, end })
}

/// Validated clock at the very start of the text, in minutes of day.
pub fn leading_clock_minutes(text: &str) -> Option<u32> {
    let (_, hour, minute) = match_clock_at(text.as_bytes(), 0)?;
    validate_clock(hour, minute)
}

/// Shape-only leading clock text (`"9:15"` out of `"9:15 standup"`).
pub fn leading_clock_text(text: &str) -> Option<&str> {
    let (len, _, _) = match_clock_at(text.as_bytes(), 0)?;
    Some(&text[..len])
}

/// Whether the entire string is one `HH:MM` clock.
pub fn is_clock(text: &str) -> bool {
    matches!(match_clock_at(text.as_bytes(), 0), Some((len, _, _)) if len == text.len())
}

/// Remove the first time-range span, if any.
pub fn strip_first_time_range(text: &str) -> String {
    match find_time_range_span(text) {
        Some((span, _, _)) => format!("{}{}", &text[..span.start], &text[span.end..]),
        None => text.to_string(),
    }
}

/// Replace every time-range span with a single space.
pub fn blank_time_ranges(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some((span, _, _)) = find_time_range_span(rest) {
        out.push_str(&rest[..span.start]);
        out.push(' ');
        rest = &rest[span.end..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "timegrid_tests.rs"]
mod tests;
