// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying the process exit status a command wants.
//!
//! Only `main()` terminates the process; commands signal a specific code
//! (release-notes extraction exits 1 on an unknown version, the MCP loop
//! exits 1 on a framing error) by returning this through `anyhow`.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    code: i32,
    message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
