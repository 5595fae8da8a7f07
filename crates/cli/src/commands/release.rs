// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Extract one version's section from the changelog.

use crate::exit_error::ExitError;
use anyhow::{Context, Result};
use clap::Args;
use cr_status::extract_release_notes;
use std::fs;
use std::path::PathBuf;

#[derive(Args)]
pub struct ExtractArgs {
    /// Semver string like 1.0.0
    #[arg(long)]
    pub version: String,

    /// Changelog file
    #[arg(long, default_value = "CHANGELOG.md")]
    pub changelog: PathBuf,
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let text = fs::read_to_string(&args.changelog)
        .with_context(|| format!("reading {}", args.changelog.display()))?;

    match extract_release_notes(&text, &args.version) {
        Ok(notes) => {
            print!("{notes}");
            Ok(())
        }
        Err(err) => Err(ExitError::new(1, err.to_string()).into()),
    }
}
