// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cr-core: canonical runtime event model for the control-room ledger

pub mod clock;
pub mod event;
pub mod normalize;
pub mod time_fmt;
pub mod timestamp;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::{
    build_event, deterministic_event_id, sort_events, source_priority, EventPayload, EventType,
    RunKey, RuntimeEvent, SOURCE_CRON_RUNS, SOURCE_SESSIONS_STORE, SOURCE_SUBAGENT_REGISTRY,
};
pub use normalize::{normalize_model, normalize_thinking};
pub use time_fmt::{format_local_datetime, format_local_hhmm, local_day};
pub use timestamp::parse_timestamp_ms;
