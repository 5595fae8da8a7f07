// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard app version from the sibling manifest.

use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read `version` from a `package.json`-style manifest; `0.0.0` when the
/// manifest is missing or unreadable.
pub fn control_room_version(manifest_file: &Path) -> String {
    let Ok(text) = fs::read_to_string(manifest_file) else {
        return "0.0.0".to_string();
    };
    let Ok(doc) = serde_json::from_str::<Value>(&text) else {
        return "0.0.0".to_string();
    };
    doc.get("version")
        .and_then(Value::as_str)
        .unwrap_or("0.0.0")
        .to_string()
}
