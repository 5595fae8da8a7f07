// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Serve control-room tools over framed JSON-RPC on stdio.

use crate::exit_error::ExitError;
use anyhow::Result;
use cr_mcp::{McpServer, ServerConfig};

pub fn run() -> Result<()> {
    let server = McpServer::new(ServerConfig::default());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();

    match server.run(&mut reader, &mut writer) {
        Ok(()) => Ok(()),
        Err(err) => Err(ExitError::new(1, format!("protocol error: {err}")).into()),
    }
}
