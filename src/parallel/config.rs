//! Configuration for a worker pool run.

use crate::error::ConfigError;
use std::time::Duration;

/// Default pause between search steps.
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(100);

/// Configuration for a worker pool run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Pause after each state-changing step, for observability only.
    pub step_delay: Duration,
    /// Snapshot channel bound (None = one slot per worker).
    pub channel_capacity: Option<usize>,
    /// Number of workers to spawn (None = one per row of the board).
    pub workers: Option<usize>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            step_delay: DEFAULT_STEP_DELAY,
            channel_capacity: None,
            workers: None,
        }
    }
}

impl PoolConfig {
    /// Set the pause between search steps.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Set the snapshot channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = Some(capacity);
        self
    }

    /// Set the snapshot channel capacity from an Option.
    pub fn with_channel_capacity_option(mut self, capacity: Option<usize>) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Spawn a fixed number of workers instead of one per row.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the worker count from an Option.
    pub fn with_workers_option(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Number of workers for a board of size `size`.
    pub fn resolved_workers(&self, size: usize) -> usize {
        self.workers.unwrap_or(size)
    }

    /// Channel capacity for `workers` workers.
    pub fn resolved_capacity(&self, workers: usize) -> usize {
        self.channel_capacity.unwrap_or(workers)
    }

    /// Check that a run on a board of size `size` can be started. Returns the
    /// resolved `(workers, capacity)` pair.
    pub fn validate(&self, size: usize) -> Result<(usize, usize), ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidBoardSize(0));
        }
        let workers = self.resolved_workers(size);
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        // worker i anchors at row i
        if workers > size {
            return Err(ConfigError::StartRowOutOfRange {
                row: workers - 1,
                size,
            });
        }
        let capacity = self.resolved_capacity(workers);
        if capacity == 0 {
            return Err(ConfigError::ZeroChannelCapacity);
        }
        Ok((workers, capacity))
    }
}

/// Convert an externally supplied board size, rejecting zero and negatives.
pub fn board_size(n: i64) -> Result<usize, ConfigError> {
    if n <= 0 {
        return Err(ConfigError::InvalidBoardSize(n));
    }
    usize::try_from(n).map_err(|_| ConfigError::InvalidBoardSize(n))
}
