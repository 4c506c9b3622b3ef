//! Concurrent execution of search workers and aggregation of their progress.
//!
//! # Architecture
//!
//! - A **pool** spawns one thread per worker and owns the run's
//!   cancellation signal and bounded snapshot channel
//! - Each **worker** drives a search engine and publishes snapshots with a
//!   non-blocking send, dropping them when the channel is full
//! - A single **aggregator** drains the channel, keeps the latest snapshot
//!   per worker, and hands a copied view to a render sink
//!
//! Shutdown runs in a fixed order: set the cancellation signal, interrupt
//! paced workers, join them, stop the aggregator, then release the channel.
//!
//! # Example
//!
//! ```ignore
//! use queen_race::parallel::{PoolConfig, SnapshotAggregator, WorkerPool};
//!
//! let mut pool = WorkerPool::new(PoolConfig::default());
//! let colors = pool.start(8)?.clone();
//! let mut aggregator = SnapshotAggregator::new(|view| println!("{:?}", view.states.len()));
//! aggregator.start(pool.snapshots().unwrap(), colors)?;
//! ```

pub mod aggregator;
pub mod channel;
pub mod config;
pub mod pool;

pub use aggregator::{AggregatedView, AggregatorSummary, RenderSink, SnapshotAggregator};
pub use channel::CancellationSignal;
pub use config::{DEFAULT_STEP_DELAY, PoolConfig, board_size};
pub use pool::WorkerPool;
