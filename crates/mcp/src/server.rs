// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request dispatch for the control-room MCP server.
//!
//! One request at a time; the next read blocks until the previous
//! response has been flushed.

use crate::tools;
use crate::wire::{self, ProtocolError};
use serde_json::{json, Map, Value};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

pub const PROTOCOL_VERSION: &str = "2025-03-26";

const SERVER_NAME: &str = "control-room-mcp";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Root against which relative tool paths resolve.
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

pub struct McpServer {
    config: ServerConfig,
}

fn tool_defs() -> Value {
    json!([
        {
            "name": "issue.snapshot",
            "description": "Fetch open GitHub issues and optionally write a markdown snapshot.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "repo": {"type": "string"},
                    "limit": {"type": "integer", "minimum": 1, "maximum": 200},
                    "out": {"type": "string"},
                },
                "required": ["repo"],
                "additionalProperties": false,
            },
        },
        {
            "name": "status.build",
            "description": "Build a control-room status payload JSON snapshot.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "workspace": {"type": "string"},
                    "jobsFile": {"type": "string"},
                    "out": {"type": "string"},
                    "liveRuntime": {"type": "boolean"},
                },
                "additionalProperties": false,
            },
        },
        {
            "name": "release.extract-notes",
            "description": "Extract the release-notes section for a semver from the changelog.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "version": {"type": "string"},
                    "changelog": {"type": "string"},
                    "out": {"type": "string"},
                },
                "required": ["version"],
                "additionalProperties": false,
            },
        },
        {
            "name": "runtime.materialize",
            "description": "Replay the runtime events journal into the materialized snapshot.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "eventsFile": {"type": "string"},
                    "out": {"type": "string"},
                    "staleMs": {"type": "integer", "minimum": 1000},
                    "nowMs": {"type": "integer", "minimum": 1},
                },
                "additionalProperties": false,
            },
        },
    ])
}

fn tool_result(text: String, structured: Value, is_error: bool) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "structuredContent": structured,
        "isError": is_error,
    })
}

impl McpServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Serve until clean EOF or `shutdown`. Framing errors surface to the
    /// caller, which exits non-zero.
    pub fn run<R: BufRead, W: Write>(
        &self,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<(), ProtocolError> {
        loop {
            let Some(message) = wire::read_message(reader)? else {
                return Ok(());
            };

            let (proceed, response) = self.handle_request(&message);
            if let Some(response) = response {
                wire::write_message(writer, &response)?;
            }
            if !proceed {
                return Ok(());
            }
        }
    }

    /// Handle one request; returns `(keep_serving, response)`.
    ///
    /// Requests without an id are notifications and get no response.
    pub fn handle_request(&self, message: &Map<String, Value>) -> (bool, Option<Value>) {
        let id = message.get("id").filter(|id| !id.is_null());
        let params = message
            .get("params")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let Some(method) = message.get("method").and_then(Value::as_str) else {
            return match id {
                Some(id) => (
                    true,
                    Some(wire::jsonrpc_error(id, -32600, "invalid request: method missing")),
                ),
                None => (true, None),
            };
        };
        debug!(method, "mcp request");

        match method {
            "initialize" => {
                let result = json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {"tools": {}},
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                });
                (true, id.map(|id| wire::jsonrpc_success(id, result)))
            }
            "ping" => (true, id.map(|id| wire::jsonrpc_success(id, json!({})))),
            "tools/list" => (
                true,
                id.map(|id| wire::jsonrpc_success(id, json!({"tools": tool_defs()}))),
            ),
            "tools/call" => (
                true,
                id.map(|id| wire::jsonrpc_success(id, self.handle_tools_call(&params))),
            ),
            "notifications/initialized" => (true, None),
            "shutdown" => (false, id.map(|id| wire::jsonrpc_success(id, json!({})))),
            other => (
                true,
                id.map(|id| {
                    wire::jsonrpc_error(id, -32601, &format!("method not found: {other}"))
                }),
            ),
        }
    }

    fn handle_tools_call(&self, params: &Map<String, Value>) -> Value {
        let Some(name) = params.get("name").and_then(Value::as_str).filter(|n| !n.is_empty())
        else {
            return tool_result(
                "tool call missing name".to_string(),
                json!({"ok": false, "error": "tool call missing name"}),
                true,
            );
        };

        let empty = Map::new();
        let args = params
            .get("arguments")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        let root = &self.config.root;

        let outcome = match name {
            "issue.snapshot" => tools::issue_snapshot(root, args),
            "status.build" => tools::status_build(root, args),
            "release.extract-notes" => tools::release_extract(root, args),
            "runtime.materialize" => tools::runtime_materialize(root, args),
            _ => {
                return tool_result(
                    format!("unknown tool: {name}"),
                    json!({"ok": false, "error": format!("unknown tool: {name}")}),
                    true,
                );
            }
        };

        match outcome {
            Ok(result) => tool_result(
                format!("ok: {name}"),
                json!({"ok": true, "tool": name, "result": result}),
                false,
            ),
            Err(err) => tool_result(
                format!("tool failed: {err}"),
                json!({"ok": false, "tool": name, "error": err.to_string()}),
                true,
            ),
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
