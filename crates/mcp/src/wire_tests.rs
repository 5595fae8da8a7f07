// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::io::Cursor;

fn frame(body: &str) -> Vec<u8> {
    format!("Content-Length: {}\r\n\r\n{body}", body.len()).into_bytes()
}

#[test]
fn read_write_round_trips() {
    let payload = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});

    let mut buffer = Vec::new();
    write_message(&mut buffer, &payload).unwrap();

    let header = format!(
        "Content-Length: {}\r\n\r\n",
        serde_json::to_vec(&payload).unwrap().len()
    );
    assert!(buffer.starts_with(header.as_bytes()));

    let mut cursor = Cursor::new(buffer);
    let read_back = read_message(&mut cursor).unwrap().unwrap();
    assert_eq!(Value::Object(read_back), payload);
}

#[test]
fn clean_eof_reads_none() {
    let mut cursor = Cursor::new(Vec::new());
    assert!(read_message(&mut cursor).unwrap().is_none());
}

#[test]
fn header_names_are_case_insensitive() {
    let body = r#"{"jsonrpc":"2.0"}"#;
    let mut cursor = Cursor::new(
        format!("CONTENT-LENGTH: {}\r\nX-Extra: 1\r\n\r\n{body}", body.len()).into_bytes(),
    );
    assert!(read_message(&mut cursor).unwrap().is_some());
}

#[test]
fn missing_content_length_is_fatal() {
    let mut cursor = Cursor::new(b"X-Other: 1\r\n\r\n{}".to_vec());
    assert!(matches!(
        read_message(&mut cursor),
        Err(ProtocolError::MissingContentLength)
    ));
}

#[test]
fn malformed_header_line_is_fatal() {
    let mut cursor = Cursor::new(b"not a header\r\n\r\n{}".to_vec());
    assert!(matches!(
        read_message(&mut cursor),
        Err(ProtocolError::MalformedHeader)
    ));
}

#[test]
fn invalid_content_length_is_fatal() {
    let mut cursor = Cursor::new(b"Content-Length: soon\r\n\r\n{}".to_vec());
    assert!(matches!(
        read_message(&mut cursor),
        Err(ProtocolError::InvalidContentLength)
    ));
}

#[test]
fn truncated_payload_is_fatal() {
    let mut cursor = Cursor::new(b"Content-Length: 99\r\n\r\n{}".to_vec());
    assert!(matches!(
        read_message(&mut cursor),
        Err(ProtocolError::UnexpectedEofPayload)
    ));
}

#[test]
fn eof_inside_headers_is_fatal() {
    let mut cursor = Cursor::new(b"Content-Length: 2\r\n".to_vec());
    assert!(matches!(
        read_message(&mut cursor),
        Err(ProtocolError::UnexpectedEofHeaders)
    ));
}

#[test]
fn invalid_json_is_fatal() {
    let mut cursor = Cursor::new(frame("{broken"));
    assert!(matches!(
        read_message(&mut cursor),
        Err(ProtocolError::InvalidJson)
    ));
}

#[test]
fn non_object_top_level_is_fatal() {
    let mut cursor = Cursor::new(frame("[1,2,3]"));
    assert!(matches!(
        read_message(&mut cursor),
        Err(ProtocolError::NotAnObject)
    ));
}

#[test]
fn back_to_back_frames_read_sequentially() {
    let mut bytes = frame(r#"{"id":1}"#);
    bytes.extend(frame(r#"{"id":2}"#));
    let mut cursor = Cursor::new(bytes);

    let first = read_message(&mut cursor).unwrap().unwrap();
    let second = read_message(&mut cursor).unwrap().unwrap();
    assert_eq!(first.get("id"), Some(&json!(1)));
    assert_eq!(second.get("id"), Some(&json!(2)));
    assert!(read_message(&mut cursor).unwrap().is_none());
}
