// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    bare_gpt      = { "gpt-5.3-codex", Some("openai-codex/gpt-5.3-codex") },
    prefixed      = { "openai-codex/gpt-5.3-codex", Some("openai-codex/gpt-5.3-codex") },
    other_vendor  = { "sonnet-latest", Some("sonnet-latest") },
    padded        = { "  gpt-4o  ", Some("openai-codex/gpt-4o") },
    empty         = { "", None },
    blank         = { "   ", None },
)]
fn model_normalization(raw: &str, expected: Option<&str>) {
    assert_eq!(normalize_model(raw).as_deref(), expected);
}

#[yare::parameterized(
    high        = { "high", Some("high") },
    min_alias   = { "min", Some("minimal") },
    very_high   = { "very-high", Some("extra_high") },
    maximum     = { "Maximum", Some("extra_high") },
    max_alias   = { "max", Some("extra_high") },
    spaced      = { "extra high", Some("extra_high") },
    empty       = { "", None },
)]
fn thinking_normalization(raw: &str, expected: Option<&str>) {
    assert_eq!(normalize_thinking(raw).as_deref(), expected);
}
