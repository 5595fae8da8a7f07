// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Empty lib target so `cr` can be depended on by workspace integration tests
//! that need `CARGO_BIN_EXE_cr` (see `assert_cmd::Command::cargo_bin`).
