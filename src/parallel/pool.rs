//! Worker pool that owns a run's threads, channels, and cancellation signal.

use crate::error::RunError;
use crate::model::{ColorAssignment, Snapshot};
use crate::parallel::channel::{CancellationSignal, RunChannels, create_run_channels};
use crate::parallel::config::PoolConfig;
use crate::search::engine::SearchEngine;
use crate::search::worker::{WorkerStatistics, run_worker};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Bookkeeping for the current run.
struct ActiveRun {
    size: usize,
    channels: RunChannels,
    workers: Vec<JoinHandle<WorkerStatistics>>,
    colors: ColorAssignment,
}

/// Spawns and stops the set of search workers for a run.
///
/// Start and stop take `&mut self`, so they are serialized by the borrow
/// checker; `start` also fully stops any previous run before creating the
/// next run's channel.
pub struct WorkerPool {
    config: PoolConfig,
    cancel: Arc<CancellationSignal>,
    run: Option<ActiveRun>,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            cancel: Arc::new(CancellationSignal::new()),
            run: None,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Spawn one worker per starting row on a board of size `size`.
    ///
    /// Configuration is validated before anything is spawned or any previous
    /// run is touched.
    pub fn start(&mut self, size: usize) -> Result<&ColorAssignment, RunError> {
        let (num_workers, capacity) = self.config.validate(size)?;
        let engines = (0..num_workers)
            .map(|worker_id| SearchEngine::new(worker_id, worker_id, size))
            .collect::<Result<Vec<_>, _>>()?;

        self.stop();
        self.cancel.reset();

        let (mut channels, contexts) =
            create_run_channels(num_workers, capacity, self.config.step_delay, &self.cancel);

        let mut workers = Vec::with_capacity(num_workers);
        for (engine, ctx) in engines.into_iter().zip(contexts) {
            let role = format!("queen-worker-{}", ctx.worker_id);
            let spawned = std::thread::Builder::new()
                .name(role.clone())
                .spawn(move || run_worker(engine, ctx));

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(source) => {
                    warn!(%role, error = %source, "spawn failed, rolling back run");
                    self.cancel.cancel();
                    channels.interrupt.take();
                    join_all(workers);
                    return Err(RunError::Spawn { role, source });
                }
            }
        }

        info!(size, workers = num_workers, capacity, "run started");
        let run = self.run.insert(ActiveRun {
            size,
            channels,
            workers,
            colors: ColorAssignment::new(num_workers),
        });
        Ok(&run.colors)
    }

    /// Consumer end of the current run's snapshot channel.
    pub fn snapshots(&self) -> Option<Receiver<Snapshot>> {
        self.run.as_ref().map(|run| run.channels.snapshots.clone())
    }

    /// Color mapping of the current run.
    pub fn colors(&self) -> Option<&ColorAssignment> {
        self.run.as_ref().map(|run| &run.colors)
    }

    /// Board size of the current run.
    pub fn size(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.size)
    }

    /// Snapshot channel bound of the current run.
    pub fn capacity(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.channels.capacity)
    }

    /// Number of worker threads not yet joined.
    pub fn active_workers(&self) -> usize {
        self.run.as_ref().map_or(0, |run| run.workers.len())
    }

    pub fn is_running(&self) -> bool {
        self.active_workers() > 0
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Block until every worker has exited on its own or `timeout` elapses.
    /// Returns true if all workers are done.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let Some(run) = self.run.as_ref() else {
            return true;
        };
        let deadline = Instant::now().checked_add(timeout);
        loop {
            let received = match deadline {
                Some(deadline) => run.channels.completion.recv_deadline(deadline),
                None => run
                    .channels
                    .completion
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(_) => continue,
                Err(RecvTimeoutError::Disconnected) => return true,
                Err(RecvTimeoutError::Timeout) => return false,
            }
        }
    }

    /// Join every worker without cancelling, waiting for natural completion.
    pub fn wait(&mut self) -> Vec<WorkerStatistics> {
        match self.run.as_mut() {
            Some(run) => {
                let stats = join_all(std::mem::take(&mut run.workers));
                run.channels.interrupt.take();
                stats
            }
            None => Vec::new(),
        }
    }

    /// Cancel every worker, wake those blocked in their pacing delay, and
    /// join them all. The run's channel is kept until [`release`].
    ///
    /// [`release`]: WorkerPool::release
    pub fn halt(&mut self) -> Vec<WorkerStatistics> {
        let Some(run) = self.run.as_mut() else {
            return Vec::new();
        };
        if run.workers.is_empty() {
            return Vec::new();
        }

        self.cancel.cancel();
        run.channels.interrupt.take();
        let stats = join_all(std::mem::take(&mut run.workers));
        debug!(joined = stats.len(), "all workers joined");
        stats
    }

    /// Drop the run's channel and bookkeeping. Halts first if needed.
    pub fn release(&mut self) {
        self.halt();
        if let Some(run) = self.run.take() {
            let discarded = run.channels.snapshots.try_iter().count();
            info!(size = run.size, discarded, "run released");
        }
    }

    /// Halt and release. Calling this with no active run is a no-op.
    pub fn stop(&mut self) -> Vec<WorkerStatistics> {
        let stats = self.halt();
        self.release();
        stats
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn join_all(handles: Vec<JoinHandle<WorkerStatistics>>) -> Vec<WorkerStatistics> {
    handles
        .into_iter()
        .filter_map(|handle| {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            match handle.join() {
                Ok(stats) => Some(stats),
                Err(_) => {
                    warn!(thread = %name, "worker panicked");
                    None
                }
            }
        })
        .collect()
}
