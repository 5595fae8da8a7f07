// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! cr-mcp: framed JSON-RPC 2.0 server exposing the control-room tools.
//!
//! Wire format: ASCII headers terminated by `\r\n\r\n` with a mandatory
//! `Content-Length`, then a UTF-8 JSON body.

pub mod server;
mod tools;
pub mod wire;

pub use server::{McpServer, ServerConfig, PROTOCOL_VERSION};
pub use wire::{jsonrpc_error, jsonrpc_success, read_message, write_message, ProtocolError};
