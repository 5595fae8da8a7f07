// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC-over-stdio framing (MCP-compatible transport).
//!
//! Framing errors are unrecoverable: once the byte stream is off the
//! rails there is no safe way to find the next message boundary, so the
//! caller exits non-zero.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unexpected EOF while reading headers")]
    UnexpectedEofHeaders,
    #[error("malformed header line")]
    MalformedHeader,
    #[error("missing Content-Length header")]
    MissingContentLength,
    #[error("invalid Content-Length header")]
    InvalidContentLength,
    #[error("unexpected EOF while reading payload")]
    UnexpectedEofPayload,
    #[error("invalid JSON payload")]
    InvalidJson,
    #[error("top-level JSON-RPC payload must be an object")]
    NotAnObject,
    #[error("transport io: {0}")]
    Io(#[from] std::io::Error),
    #[error("transport encode: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read one framed message. `Ok(None)` means clean EOF before any header
/// bytes.
pub fn read_message<R: BufRead>(reader: &mut R) -> Result<Option<Map<String, Value>>, ProtocolError> {
    let mut headers: HashMap<String, String> = HashMap::new();

    loop {
        let mut line = Vec::new();
        let read = reader.read_until(b'\n', &mut line)?;
        if read == 0 {
            if headers.is_empty() {
                return Ok(None);
            }
            return Err(ProtocolError::UnexpectedEofHeaders);
        }

        let trimmed = trim_ascii(&line);
        if trimmed.is_empty() {
            break;
        }

        let Some(colon) = trimmed.iter().position(|byte| *byte == b':') else {
            return Err(ProtocolError::MalformedHeader);
        };
        let key = String::from_utf8(trim_ascii(&trimmed[..colon]).to_vec())
            .map_err(|_| ProtocolError::MalformedHeader)?
            .to_ascii_lowercase();
        let value = String::from_utf8(trim_ascii(&trimmed[colon + 1..]).to_vec())
            .map_err(|_| ProtocolError::MalformedHeader)?;
        headers.insert(key, value);
    }

    let raw_length = headers
        .get("content-length")
        .ok_or(ProtocolError::MissingContentLength)?;
    let content_length: usize = raw_length
        .parse()
        .map_err(|_| ProtocolError::InvalidContentLength)?;

    let mut payload = vec![0u8; content_length];
    reader
        .read_exact(&mut payload)
        .map_err(|_| ProtocolError::UnexpectedEofPayload)?;

    let text = std::str::from_utf8(&payload).map_err(|_| ProtocolError::InvalidJson)?;
    let decoded: Value = serde_json::from_str(text).map_err(|_| ProtocolError::InvalidJson)?;
    match decoded {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(ProtocolError::NotAnObject),
    }
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(start, |at| at + 1);
    &bytes[start..end]
}

/// Write one framed message and flush.
pub fn write_message<W: Write>(writer: &mut W, payload: &Value) -> Result<(), ProtocolError> {
    let raw = serde_json::to_vec(payload)?;
    write!(writer, "Content-Length: {}\r\n\r\n", raw.len())?;
    writer.write_all(&raw)?;
    writer.flush()?;
    Ok(())
}

pub fn jsonrpc_success(id: &Value, result: Value) -> Value {
    serde_json::json!({"jsonrpc": "2.0", "id": id, "result": result})
}

pub fn jsonrpc_error(id: &Value, code: i64, message: &str) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {"code": code, "message": message},
    })
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
