//! Per-run shared state: the snapshot channel, the cancellation signal, and
//! the interrupt/completion channels handed to every worker.

use crate::model::Snapshot;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Run-wide stop flag, shared by the pool and every worker.
#[derive(Debug, Default)]
pub struct CancellationSignal {
    cancelled: AtomicBool,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if workers should stop.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Request shutdown. Returns true only for the call that flipped the flag.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::SeqCst)
    }

    /// Clear the flag for the next run. Only valid once every worker of the
    /// previous run has been joined.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// Why a worker's pacing wait ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The cancellation signal was set.
    Cancelled,
    /// The interrupt channel closed without the signal being set.
    Unexpected,
}

/// Result of a non-blocking publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    Sent,
    /// Channel at capacity; the snapshot was discarded.
    Dropped,
    /// Consumer side is gone; the snapshot was discarded.
    Disconnected,
}

/// Everything one worker needs from its run. Dropping it closes the worker's
/// ends of the snapshot and completion channels.
pub struct WorkerContext {
    pub worker_id: usize,
    pub step_delay: Duration,
    pub started: Instant,
    snapshots: Sender<Snapshot>,
    interrupt: Receiver<()>,
    cancel: Arc<CancellationSignal>,
    _completion: Sender<usize>,
}

impl WorkerContext {
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Try to enqueue without blocking.
    pub fn publish(&self, snapshot: Snapshot) -> Publish {
        match self.snapshots.try_send(snapshot) {
            Ok(()) => Publish::Sent,
            Err(TrySendError::Full(_)) => Publish::Dropped,
            Err(TrySendError::Disconnected(_)) => Publish::Disconnected,
        }
    }

    /// Sleep for the pacing delay, waking early if the run is interrupted.
    /// The cancellation flag is re-checked after the wait.
    pub fn pace(&self) -> Result<(), Interruption> {
        match self.interrupt.recv_timeout(self.step_delay) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                return Err(if self.is_cancelled() {
                    Interruption::Cancelled
                } else {
                    Interruption::Unexpected
                });
            }
        }
        if self.is_cancelled() {
            return Err(Interruption::Cancelled);
        }
        Ok(())
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Pool-side ends of a run's channels.
pub struct RunChannels {
    /// Consumer end of the snapshot channel.
    pub snapshots: Receiver<Snapshot>,
    /// Dropping this wakes every worker blocked in [`WorkerContext::pace`].
    pub interrupt: Option<Sender<()>>,
    /// Disconnects once every worker context has been dropped.
    pub completion: Receiver<usize>,
    pub capacity: usize,
}

/// Create the channels for a run and one context per worker.
///
/// The pool keeps no sender of its own on the snapshot channel, so the
/// consumer sees a disconnect once every worker has exited.
pub fn create_run_channels(
    num_workers: usize,
    capacity: usize,
    step_delay: Duration,
    cancel: &Arc<CancellationSignal>,
) -> (RunChannels, Vec<WorkerContext>) {
    let started = Instant::now();
    let (snapshot_tx, snapshot_rx) = bounded(capacity);
    let (interrupt_tx, interrupt_rx) = bounded::<()>(0);
    let (completion_tx, completion_rx) = bounded(num_workers);

    let workers = (0..num_workers)
        .map(|worker_id| WorkerContext {
            worker_id,
            step_delay,
            started,
            snapshots: snapshot_tx.clone(),
            interrupt: interrupt_rx.clone(),
            cancel: Arc::clone(cancel),
            _completion: completion_tx.clone(),
        })
        .collect();

    let run = RunChannels {
        snapshots: snapshot_rx,
        interrupt: Some(interrupt_tx),
        completion: completion_rx,
        capacity,
    };

    (run, workers)
}
