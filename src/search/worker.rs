//! Worker loop: drive a [`SearchEngine`] and stream its snapshots.

use crate::model::Phase;
use crate::parallel::channel::{Interruption, Publish, WorkerContext};
use crate::search::engine::SearchEngine;
use std::fmt;
use tracing::{debug, trace};

/// How a worker's search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Reached a full placement.
    Solved,
    /// Every alternative with this anchor was exhausted.
    Exhausted,
    /// Stopped by cancellation or interruption before finishing.
    Cancelled,
}

impl fmt::Display for WorkerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerOutcome::Solved => write!(f, "solved"),
            WorkerOutcome::Exhausted => write!(f, "exhausted"),
            WorkerOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Per-worker counters returned when the worker thread is joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStatistics {
    pub worker_id: usize,
    pub anchor_row: usize,
    /// State-changing steps taken after the initial placement.
    pub steps: u64,
    /// Snapshots accepted by the channel.
    pub published: u64,
    /// Snapshots discarded because the channel was full or closed.
    pub dropped: u64,
    pub outcome: WorkerOutcome,
}

impl WorkerStatistics {
    fn new(engine: &SearchEngine) -> Self {
        Self {
            worker_id: engine.worker_id(),
            anchor_row: engine.anchor_row(),
            steps: 0,
            published: 0,
            dropped: 0,
            outcome: WorkerOutcome::Cancelled,
        }
    }
}

/// Run `engine` until it finishes or the run is cancelled.
///
/// Never blocks on publication: a full channel drops the snapshot. On
/// cancellation the worker exits without emitting a trailing snapshot.
pub fn run_worker(mut engine: SearchEngine, ctx: WorkerContext) -> WorkerStatistics {
    let mut stats = WorkerStatistics::new(&engine);
    debug!(
        worker = ctx.worker_id,
        anchor_row = engine.anchor_row(),
        size = engine.board().size(),
        "worker started"
    );

    if ctx.is_cancelled() {
        debug!(worker = ctx.worker_id, "cancelled before first step");
        return stats;
    }
    publish(&engine, &ctx, &mut stats);

    loop {
        match engine.phase() {
            Phase::Solution => {
                stats.outcome = WorkerOutcome::Solved;
                break;
            }
            Phase::Terminated => {
                stats.outcome = WorkerOutcome::Exhausted;
                break;
            }
            _ => {}
        }

        if let Err(reason) = ctx.pace() {
            match reason {
                Interruption::Cancelled => {
                    debug!(worker = ctx.worker_id, steps = engine.steps(), "cancelled")
                }
                Interruption::Unexpected => debug!(
                    worker = ctx.worker_id,
                    steps = engine.steps(),
                    "interrupted without cancellation, exiting"
                ),
            }
            break;
        }

        engine.step();
        stats.steps = engine.steps();
        publish(&engine, &ctx, &mut stats);
    }

    debug!(
        worker = ctx.worker_id,
        outcome = %stats.outcome,
        steps = stats.steps,
        published = stats.published,
        dropped = stats.dropped,
        "worker finished"
    );
    stats
}

fn publish(engine: &SearchEngine, ctx: &WorkerContext, stats: &mut WorkerStatistics) {
    match ctx.publish(engine.snapshot(ctx.elapsed())) {
        Publish::Sent => stats.published += 1,
        Publish::Dropped | Publish::Disconnected => {
            stats.dropped += 1;
            trace!(worker = ctx.worker_id, step = engine.steps(), "snapshot dropped");
        }
    }
}
