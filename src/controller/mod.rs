//! Start/stop entry points used by front ends.
//!
//! [`RunController`] wires a [`WorkerPool`] to a [`SnapshotAggregator`] and
//! enforces the ordering between them: the pool starts before the
//! aggregator, and on shutdown the workers are joined before the aggregator
//! stops and the channel is released.

use crate::error::RunError;
use crate::model::ColorAssignment;
use crate::parallel::{
    AggregatedView, PoolConfig, RenderSink, SnapshotAggregator, WorkerPool, board_size,
};
use crate::search::WorkerStatistics;
use std::time::Duration;
use tracing::info;

/// Outcome of a run that was allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Statistics of every joined worker, ordered by worker id.
    pub workers: Vec<WorkerStatistics>,
    /// Final aggregated state.
    pub view: AggregatedView,
    /// Snapshots the aggregator consumed.
    pub received: u64,
    /// True if the timeout elapsed and remaining workers were cancelled.
    pub timed_out: bool,
}

/// Owns a pool and its aggregator for repeated runs.
pub struct RunController<S: RenderSink> {
    pool: WorkerPool,
    aggregator: SnapshotAggregator<S>,
}

impl<S: RenderSink> RunController<S> {
    pub fn new(config: PoolConfig, sink: S) -> Self {
        Self {
            pool: WorkerPool::new(config),
            aggregator: SnapshotAggregator::new(sink),
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn sink(&self) -> &S {
        self.aggregator.sink()
    }

    pub fn is_running(&self) -> bool {
        self.pool.is_running()
    }

    /// Start a run on an `n`×`n` board. Rejects invalid `n` before touching
    /// the current run; otherwise stops any current run first.
    pub fn start_run(&mut self, n: i64) -> Result<ColorAssignment, RunError> {
        let size = board_size(n)?;
        self.pool.config().validate(size)?;

        self.stop_run();
        let colors = self.pool.start(size)?.clone();

        let Some(snapshots) = self.pool.snapshots() else {
            return Ok(colors);
        };
        if let Err(e) = self.aggregator.start(snapshots, colors.clone()) {
            self.pool.stop();
            return Err(e);
        }
        Ok(colors)
    }

    /// Cancel the current run and clear all state. Safe to call repeatedly.
    pub fn stop_run(&mut self) -> Vec<WorkerStatistics> {
        let mut stats = self.pool.halt();
        self.aggregator.stop();
        self.pool.release();

        if !stats.is_empty() {
            info!(workers = stats.len(), "run stopped");
        }
        stats.sort_by_key(|s| s.worker_id);
        stats
    }

    /// Let the current run finish on its own, cancelling whatever is still
    /// running after `timeout`. Returns `None` if no run was started.
    pub fn finish_run(&mut self, timeout: Option<Duration>) -> Option<RunSummary> {
        if self.pool.size().is_none() {
            return None;
        }

        let finished = self.pool.wait_timeout(timeout.unwrap_or(Duration::MAX));
        let mut workers = self.pool.halt();
        let summary = self.aggregator.wait().unwrap_or_default();
        self.pool.release();

        workers.sort_by_key(|s| s.worker_id);
        info!(
            workers = workers.len(),
            received = summary.received,
            timed_out = !finished,
            "run finished"
        );
        Some(RunSummary {
            workers,
            view: summary.view,
            received: summary.received,
            timed_out: !finished,
        })
    }
}
