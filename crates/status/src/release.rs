// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Changelog section extraction.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReleaseNotesError {
    #[error("Version {0} not found in changelog")]
    VersionNotFound(String),
}

/// Semver prefix (`1.2.3`) with a trailing word boundary.
fn scan_semver(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut at = 0usize;
    for part in 0..3 {
        let start = at;
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        if at == start {
            return None;
        }
        if part < 2 {
            if bytes.get(at) != Some(&b'.') {
                return None;
            }
            at += 1;
        }
    }
    match bytes.get(at) {
        Some(byte) if byte.is_ascii_alphanumeric() || *byte == b'_' => None,
        _ => Some(&text[..at]),
    }
}

/// `## v?X.Y.Z` heading version, if the line is one.
fn version_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let candidate = rest.strip_prefix('v').unwrap_or(rest);
    scan_semver(candidate)
}

/// Extract one version's section, bounded by the next version heading at
/// the same level.
pub fn extract_release_notes(
    changelog_text: &str,
    version: &str,
) -> Result<String, ReleaseNotesError> {
    let mut capture = false;
    let mut out: Vec<&str> = Vec::new();

    for line in changelog_text.lines() {
        if let Some(heading_version) = version_heading(line.trim()) {
            if capture {
                break;
            }
            if heading_version == version {
                capture = true;
                out.push(line);
                continue;
            }
        }
        if capture {
            out.push(line);
        }
    }

    if out.is_empty() {
        return Err(ReleaseNotesError::VersionNotFound(version.to_string()));
    }

    Ok(format!("{}\n", out.join("\n").trim()))
}

#[cfg(test)]
#[path = "release_tests.rs"]
mod tests;
