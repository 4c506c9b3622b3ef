//! Concurrent anchored N-queens search with latest-state aggregation.
//!
//! A [`WorkerPool`] runs one backtracking [`SearchEngine`] per starting row,
//! all sharing a cancellation signal and a bounded snapshot channel. A
//! [`SnapshotAggregator`] drains that channel, keeps the latest
//! [`Snapshot`] per worker, and hands a copied [`AggregatedView`] to a
//! [`RenderSink`]. [`RunController`] ties the two together behind
//! start/stop calls.

pub mod controller;
pub mod error;
pub mod model;
pub mod parallel;
pub mod search;

pub use controller::{RunController, RunSummary};
pub use error::{ConfigError, RunError};
pub use model::{BoardState, Color, ColorAssignment, Phase, Snapshot};
pub use parallel::{
    AggregatedView, CancellationSignal, PoolConfig, RenderSink, SnapshotAggregator, WorkerPool,
};
pub use search::{SearchEngine, WorkerOutcome, WorkerStatistics};
