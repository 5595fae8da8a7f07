// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cr`: control-room runtime ledger and status tooling.

mod commands;
mod exit_error;

use clap::{Parser, Subcommand};
use exit_error::ExitError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cr", version, about = "Control-room runtime ledger and status tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect producer lifecycle traces into the runtime-events journal
    CollectRuntimeEvents(commands::collect::CollectArgs),
    /// Replay the journal into the materialized runtime-state snapshot
    MaterializeRuntimeState(commands::materialize::MaterializeArgs),
    /// Build the dashboard status payload JSON
    BuildStatusJson(commands::status::BuildArgs),
    /// Extract one version's section from the changelog
    ExtractReleaseNotes(commands::release::ExtractArgs),
    /// Serve control-room tools over framed JSON-RPC on stdio
    McpServer,
}

fn main() {
    // Logs go to stderr: stdout belongs to command output and MCP frames.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::CollectRuntimeEvents(args) => commands::collect::run(args),
        Command::MaterializeRuntimeState(args) => commands::materialize::run(args),
        Command::BuildStatusJson(args) => commands::status::run(args),
        Command::ExtractReleaseNotes(args) => commands::release::run(args),
        Command::McpServer => commands::mcp::run(),
    };

    if let Err(err) = result {
        if let Some(exit) = err.downcast_ref::<ExitError>() {
            eprintln!("{exit}");
            std::process::exit(exit.code());
        }
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
