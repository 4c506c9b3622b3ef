//! Single consumer that keeps the latest snapshot per worker and republishes
//! a copied view to a render sink after every update.

use crate::error::RunError;
use crate::model::{ColorAssignment, Phase, Snapshot};
use crossbeam_channel::{Receiver, Sender, bounded, select};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Latest known state of every worker that has reported, plus the run's
/// colors. Each sink call receives its own copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedView {
    pub states: BTreeMap<usize, Snapshot>,
    pub colors: ColorAssignment,
}

impl AggregatedView {
    pub fn latest(&self, worker_id: usize) -> Option<&Snapshot> {
        self.states.get(&worker_id)
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Workers whose latest snapshot is a full placement.
    pub fn solved(&self) -> impl Iterator<Item = &Snapshot> + '_ {
        self.states
            .values()
            .filter(|s| s.phase() == Phase::Solution)
    }

    /// True once every colored worker has reported a terminal phase.
    pub fn all_terminal(&self) -> bool {
        !self.colors.is_empty()
            && self.colors.iter().all(|(id, _)| {
                self.states
                    .get(&id)
                    .is_some_and(|s| s.phase().is_terminal())
            })
    }
}

/// Receiver of aggregated updates. Called on the consumer thread; it should
/// return quickly and do its own hand-off if it needs another thread.
pub trait RenderSink: Send + Sync + 'static {
    fn update(&self, view: AggregatedView);
}

impl<F> RenderSink for F
where
    F: Fn(AggregatedView) + Send + Sync + 'static,
{
    fn update(&self, view: AggregatedView) {
        self(view)
    }
}

/// What the consumer loop saw before it exited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatorSummary {
    /// Snapshots taken off the channel.
    pub received: u64,
    /// Final aggregated state.
    pub view: AggregatedView,
}

struct Consumer {
    stop: Sender<()>,
    handle: JoinHandle<AggregatorSummary>,
}

/// Drains a run's snapshot channel on a dedicated thread.
pub struct SnapshotAggregator<S: RenderSink> {
    sink: Arc<S>,
    consumer: Option<Consumer>,
}

impl<S: RenderSink> SnapshotAggregator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Arc::new(sink),
            consumer: None,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_running(&self) -> bool {
        self.consumer.is_some()
    }

    /// Spawn the consumer loop on `snapshots`. Any previous loop is stopped
    /// first.
    pub fn start(
        &mut self,
        snapshots: Receiver<Snapshot>,
        colors: ColorAssignment,
    ) -> Result<(), RunError> {
        self.stop();

        let (stop_tx, stop_rx) = bounded::<()>(0);
        let sink = Arc::clone(&self.sink);
        let role = "snapshot-aggregator".to_string();
        let handle = std::thread::Builder::new()
            .name(role.clone())
            .spawn(move || consume(snapshots, stop_rx, colors, sink.as_ref()))
            .map_err(|source| RunError::Spawn { role, source })?;

        self.consumer = Some(Consumer {
            stop: stop_tx,
            handle,
        });
        debug!("aggregator started");
        Ok(())
    }

    /// Signal the loop to exit, join it, and discard the aggregated state.
    /// Safe to call when not running.
    pub fn stop(&mut self) {
        if let Some(Consumer { stop, handle }) = self.consumer.take() {
            drop(stop);
            match handle.join() {
                Ok(summary) => debug!(received = summary.received, "aggregator stopped"),
                Err(_) => warn!("aggregator thread panicked"),
            }
        }
    }

    /// Wait for the loop to drain the channel after every producer has
    /// disconnected, and return what it aggregated.
    pub fn wait(&mut self) -> Option<AggregatorSummary> {
        let Consumer { stop, handle } = self.consumer.take()?;
        let summary = handle.join();
        drop(stop);
        match summary {
            Ok(summary) => Some(summary),
            Err(_) => {
                warn!("aggregator thread panicked");
                None
            }
        }
    }
}

impl<S: RenderSink> Drop for SnapshotAggregator<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn consume<S: RenderSink + ?Sized>(
    snapshots: Receiver<Snapshot>,
    stop: Receiver<()>,
    colors: ColorAssignment,
    sink: &S,
) -> AggregatorSummary {
    let mut latest: BTreeMap<usize, Snapshot> = BTreeMap::new();
    let mut received = 0u64;

    loop {
        select! {
            recv(snapshots) -> msg => match msg {
                Ok(snapshot) => {
                    received += 1;
                    latest.insert(snapshot.worker_id(), snapshot);
                    sink.update(AggregatedView {
                        states: latest.clone(),
                        colors: colors.clone(),
                    });
                }
                Err(_) => {
                    debug!(received, "snapshot channel closed");
                    break;
                }
            },
            recv(stop) -> _ => break,
        }
    }

    AggregatorSummary {
        received,
        view: AggregatedView {
            states: latest,
            colors,
        },
    }
}
