// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replay the journal into the materialized runtime-state snapshot.

use anyhow::Result;
use clap::Args;
use cr_core::{Clock, SystemClock};
use cr_ledger::{materialize, DEFAULT_STALE_MS};
use std::path::PathBuf;

#[derive(Args)]
pub struct MaterializeArgs {
    /// Append-only runtime events journal
    #[arg(long)]
    pub events_file: PathBuf,

    /// Snapshot output file
    #[arg(long)]
    pub out: PathBuf,

    /// Freshness window for active candidates, in milliseconds
    #[arg(long, default_value_t = DEFAULT_STALE_MS)]
    pub stale_ms: u64,
}

pub fn run(args: MaterializeArgs) -> Result<()> {
    let snapshot = materialize(
        &args.events_file,
        &args.out,
        SystemClock.epoch_ms(),
        args.stale_ms,
    )?;

    println!(
        "runtime materialized: revision={} active={} terminals={}",
        snapshot.revision, snapshot.active_count, snapshot.terminal_count
    );
    Ok(())
}
