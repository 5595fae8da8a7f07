// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Permissive timestamp parsing across heterogeneous producer records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Integers above this are already unix milliseconds; below, unix seconds.
const UNIX_SECONDS_CUTOFF: u64 = 10_000_000_000;

/// Parse a producer timestamp field into unix milliseconds.
///
/// Accepts integer unix-ms, integer unix-s, and ISO-8601 strings (trailing
/// `Z` or explicit offset; naive forms are treated as UTC). Anything else
/// returns `None` and the caller drops the record.
pub fn parse_timestamp_ms(value: &Value) -> Option<u64> {
    match value {
        Value::Number(num) => {
            let raw = num.as_u64()?;
            if raw > UNIX_SECONDS_CUTOFF {
                Some(raw)
            } else if raw > 0 {
                Some(raw * 1000)
            } else {
                None
            }
        }
        Value::String(raw) => parse_iso_ms(raw),
        _ => None,
    }
}

fn parse_iso_ms(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return to_ms(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return to_ms(naive.and_utc());
        }
    }

    None
}

fn to_ms(instant: DateTime<Utc>) -> Option<u64> {
    u64::try_from(instant.timestamp_millis()).ok()
}

#[cfg(test)]
#[path = "timestamp_tests.rs"]
mod tests;
