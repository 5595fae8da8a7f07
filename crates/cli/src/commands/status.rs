// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build the dashboard status payload JSON.

use anyhow::{Context, Result};
use clap::Args;
use cr_core::SystemClock;
use cr_status::{build_payload, BuildPaths};
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct BuildArgs {
    /// Workspace root holding the plan/status/memory markdown
    #[arg(long)]
    pub workspace: PathBuf,

    /// Scheduler jobs file
    #[arg(long)]
    pub jobs_file: PathBuf,

    /// Payload output file
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: BuildArgs) -> Result<()> {
    let paths = BuildPaths::for_workspace(&args.workspace, &args.jobs_file);
    let payload = build_payload(&paths, &SystemClock);

    if let Some(parent) = args.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut body = serde_json::to_string_pretty(&payload)?;
    body.push('\n');
    fs::write(&args.out, body)
        .with_context(|| format!("writing payload to {}", args.out.display()))?;

    println!("wrote {}", args.out.display());
    Ok(())
}
