// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local-time rendering for display-only payload fields.

use chrono::{DateTime, Local, TimeZone};

fn local_instant(epoch_ms: u64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(epoch_ms as i64).single()
}

/// Format unix-ms as local `HH:MM`, or `n/a` when out of range.
pub fn format_local_hhmm(epoch_ms: u64) -> String {
    match local_instant(epoch_ms) {
        Some(instant) => instant.format("%H:%M").to_string(),
        None => "n/a".to_string(),
    }
}

/// Format unix-ms as local `YYYY-MM-DD HH:MM:SS`, or `n/a` when out of range.
pub fn format_local_datetime(epoch_ms: u64) -> String {
    match local_instant(epoch_ms) {
        Some(instant) => instant.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "n/a".to_string(),
    }
}

/// Local calendar day of a unix-ms instant as `YYYY-MM-DD`.
pub fn local_day(epoch_ms: u64) -> String {
    match local_instant(epoch_ms) {
        Some(instant) => instant.format("%Y-%m-%d").to_string(),
        None => "n/a".to_string(),
    }
}
