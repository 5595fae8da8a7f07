// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External watchdog probe.
//!
//! The health script is an opaque collaborator: it either answers with a
//! JSON report inside the timeout, or the status is `unknown`. No failure
//! here may ever fail a payload build.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read as _;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const PROBE_WINDOW_HOURS: &str = "8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reliability {
    pub status: String,
}

impl Reliability {
    pub fn unknown() -> Self {
        Self {
            status: "unknown".to_string(),
        }
    }
}

/// Query the watchdog report script for health status.
pub fn reliability_status(workspace_root: &Path) -> Reliability {
    let script = workspace_root
        .join("scripts")
        .join("reliability_watchdog_report.py");
    if !script.exists() {
        return Reliability::unknown();
    }
    run_probe(&script).unwrap_or_else(Reliability::unknown)
}

fn run_probe(script: &Path) -> Option<Reliability> {
    let mut child = Command::new("python3")
        .arg(script)
        .args(["--window-hours", PROBE_WINDOW_HOURS, "--json"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + PROBE_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    return None;
                }
                break;
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(_) => return None,
        }
    }

    let mut output = String::new();
    child.stdout.take()?.read_to_string(&mut output).ok()?;
    let report: Value = serde_json::from_str(&output).ok()?;
    let status = report
        .get("health")
        .and_then(|health| health.get("status"))
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    Some(Reliability {
        status: status.to_string(),
    })
}

#[cfg(test)]
#[path = "watchdog_tests.rs"]
mod tests;
