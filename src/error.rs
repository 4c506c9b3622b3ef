//! Error types for run configuration and thread management

use std::fmt;

/// A run was requested with parameters that can never produce a valid pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Board size must be a positive integer.
    InvalidBoardSize(i64),
    /// A worker would anchor outside the board.
    StartRowOutOfRange { row: usize, size: usize },
    /// Zero workers were requested.
    ZeroWorkers,
    /// A zero-capacity snapshot channel would drop every snapshot.
    ZeroChannelCapacity,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBoardSize(n) => {
                write!(f, "board size must be a positive integer, got {}", n)
            }
            ConfigError::StartRowOutOfRange { row, size } => write!(
                f,
                "starting row {} is outside the board (valid rows: 0..{})",
                row, size
            ),
            ConfigError::ZeroWorkers => write!(f, "at least one worker is required"),
            ConfigError::ZeroChannelCapacity => {
                write!(f, "snapshot channel capacity must be at least 1")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Error returned when a run cannot be started.
#[derive(Debug)]
pub enum RunError {
    /// Rejected before any thread was spawned.
    InvalidConfiguration(ConfigError),
    /// The OS refused to spawn a thread. Anything already spawned has been
    /// cancelled and joined.
    Spawn {
        role: String,
        source: std::io::Error,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::InvalidConfiguration(e) => write!(f, "invalid configuration: {}", e),
            RunError::Spawn { role, source } => {
                write!(f, "failed to spawn {} thread: {}", role, source)
            }
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::InvalidConfiguration(e) => Some(e),
            RunError::Spawn { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::InvalidConfiguration(e)
    }
}

impl RunError {
    /// True if the run was rejected during validation.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RunError::InvalidConfiguration(_))
    }
}
