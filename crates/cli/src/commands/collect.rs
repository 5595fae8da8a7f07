// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collect producer lifecycle traces into the runtime-events journal.

use anyhow::Result;
use clap::Args;
use cr_ledger::{collect_events, Journal, ProducerPaths};
use std::path::PathBuf;

#[derive(Args)]
pub struct CollectArgs {
    /// Scheduler jobs file
    #[arg(long)]
    pub jobs_file: PathBuf,

    /// Sessions store file
    #[arg(long)]
    pub sessions_file: PathBuf,

    /// Cron runs directory (one JSONL file per job id)
    #[arg(long)]
    pub runs_dir: PathBuf,

    /// Sub-agent registry file
    #[arg(long)]
    pub subagent_file: PathBuf,

    /// Append-only runtime events journal
    #[arg(long)]
    pub events_file: PathBuf,
}

pub fn run(args: CollectArgs) -> Result<()> {
    let events = collect_events(&ProducerPaths {
        jobs_file: args.jobs_file,
        sessions_file: args.sessions_file,
        runs_dir: args.runs_dir,
        subagent_file: args.subagent_file,
    });
    let appended = Journal::new(&args.events_file).append_new(&events)?;

    println!(
        "runtime events: collected={} appended={}",
        events.len(),
        appended
    );
    Ok(())
}
