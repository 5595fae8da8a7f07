// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cr-ledger: runtime-truth pipeline.
//!
//! Producers emit lifecycle traces in their own formats; the collectors
//! project them into canonical events, the journal deduplicates them by
//! content-addressed id, and the reducer replays the journal into the
//! materialized snapshot of active runs.

pub mod collect;
pub mod journal;
pub mod reconcile;
pub mod reduce;
pub mod scheduler;
pub mod snapshot;

pub use collect::{collect_events, ProducerPaths};
pub use journal::{Journal, JournalError};
pub use reconcile::{is_excluded_job_name, reconcile_live, sessions_store_degradation};
pub use reduce::{reduce_events, ActiveRun, Reduction, TerminalMark};
pub use scheduler::{synthesized_job_name, JobCatalog, JobMeta, JobRecord, JobsFile};
pub use snapshot::{
    format_revision, materialize, parse_revision, read_snapshot, write_snapshot, RuntimeSnapshot,
    RuntimeStatus, SnapshotError, SnapshotMode, DEFAULT_STALE_MS, SOURCE_LIVE_RECONCILER,
    SOURCE_MATERIALIZED_LEDGER,
};
