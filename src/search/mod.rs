//! Backtracking search for non-attacking queen placements
//!
//! Each worker runs one [`SearchEngine`] anchored at its own starting row:
//! - [`engine`]: the step-at-a-time state machine
//! - [`worker`]: the paced, cancellable loop that streams snapshots

pub mod engine;
pub mod worker;

pub use engine::{ANCHOR_COLUMN, SearchEngine};
pub use worker::{WorkerOutcome, WorkerStatistics, run_worker};
