//! Immutable point-in-time captures of a worker's board

use crate::model::board::{BoardState, queens_consistent};
use std::fmt;
use std::time::Duration;

/// Search phase a snapshot was taken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Anchor placed, nothing else yet
    Initial,
    /// A queen was just placed
    Searching,
    /// A queen was just removed
    Backtracking,
    /// Every column is occupied
    Solution,
    /// No placement exists with this anchor
    Terminated,
}

impl Phase {
    /// SOLUTION and TERMINATED end a worker's stream.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Solution | Phase::Terminated)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Initial => write!(f, "INITIAL"),
            Phase::Searching => write!(f, "SEARCHING"),
            Phase::Backtracking => write!(f, "BACKTRACKING"),
            Phase::Solution => write!(f, "SOLUTION"),
            Phase::Terminated => write!(f, "TERMINATED"),
        }
    }
}

/// One worker's board state at a given step.
///
/// The board is deep-copied on construction, so later mutation by the
/// producing engine is never visible through a published snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    worker_id: usize,
    board: BoardState,
    step: u64,
    elapsed: Duration,
    phase: Phase,
}

impl Snapshot {
    pub fn new(
        worker_id: usize,
        board: &BoardState,
        step: u64,
        elapsed: Duration,
        phase: Phase,
    ) -> Self {
        Self {
            worker_id,
            board: board.clone(),
            step,
            elapsed,
            phase,
        }
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn queens(&self) -> &[Option<usize>] {
        self.board.queens()
    }

    /// Per-worker sequence number; strictly increasing within one worker.
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Monotonic time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ordering key for "newer than" comparisons within one worker.
    pub fn timestamp(&self) -> (u64, Duration) {
        (self.step, self.elapsed)
    }

    pub fn is_consistent(&self) -> bool {
        queens_consistent(self.board.queens())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_a_deep_copy() {
        let mut board = BoardState::new(4);
        board.place(0, 0);
        let snapshot = Snapshot::new(3, &board, 1, Duration::from_millis(5), Phase::Initial);

        board.place(2, 1);
        board.remove(0);

        assert_eq!(snapshot.queens(), &[Some(0), None, None, None]);
        assert_eq!(snapshot.worker_id(), 3);
        assert_eq!(snapshot.phase(), Phase::Initial);
    }

    #[test]
    fn test_terminal_phases() {
        assert!(Phase::Solution.is_terminal());
        assert!(Phase::Terminated.is_terminal());
        assert!(!Phase::Initial.is_terminal());
        assert!(!Phase::Searching.is_terminal());
        assert!(!Phase::Backtracking.is_terminal());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Backtracking.to_string(), "BACKTRACKING");
        assert_eq!(Phase::Solution.to_string(), "SOLUTION");
    }

    #[test]
    fn test_timestamp_orders_by_step() {
        let board = BoardState::new(2);
        let a = Snapshot::new(0, &board, 1, Duration::from_millis(10), Phase::Initial);
        let b = Snapshot::new(0, &board, 2, Duration::from_millis(10), Phase::Searching);
        assert!(a.timestamp() < b.timestamp());
    }
}
