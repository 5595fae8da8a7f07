// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cr-status: dashboard payload assembly.
//!
//! Joins the materialized runtime snapshot with plan/status markdown and
//! scheduler metadata, and computes the derived views (swimlanes, trends,
//! activity feed, skill graph). Missing data degrades specific fields;
//! the payload always renders.

pub mod activity;
pub mod dedupe;
pub mod issues;
pub mod lanes;
pub mod markdown;
pub mod payload;
pub mod release;
pub mod session_probe;
pub mod skills;
pub mod timegrid;
pub mod timeline;
pub mod trends;
pub mod version;
pub mod watchdog;

pub use activity::{infer_activity_category, recent_activity, recent_findings, ActivityEntry};
pub use dedupe::dedupe_next_lane;
pub use lanes::{
    assemble_lanes, job_lane_events, runtime_lane_events, timeline_lane_events, LaneEvent,
    LaneKind, LaneState, LaneStore, Lanes,
};
pub use markdown::{
    parse_plan_blocks, parse_section_bullets, parse_today_status, PlanBlock, StatusFields,
};
pub use payload::{
    build_payload, resolve_runtime, sanitize_for_static_snapshot, BuildPaths, StatusPayload,
    SNAPSHOT_FRESH_MS,
};
pub use release::{extract_release_notes, ReleaseNotesError};
pub use session_probe::{
    is_main_session_active, lock_is_live, main_session_running, scan_session_transcript,
    MainSessionActivity,
};
pub use skills::{derive_skills, skill_artifacts, SkillGraph, SkillNode, SkillState};
pub use timegrid::{leading_clock_minutes, parse_hhmm_to_minutes, parse_time_range, TimeRange};
pub use timeline::{
    format_block, is_future_or_untimed, is_stale_active_work, resolve_active_work,
    resolve_current_focus, timeline_context, TimelineBlock, TimelineContext,
};
pub use trends::{job_success_trend, reliability_trend, status_score, TrendPoint};
pub use version::control_room_version;
pub use watchdog::{reliability_status, Reliability};
