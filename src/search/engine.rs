//! Anchored backtracking search for one worker
//!
//! The engine pins a queen at `(anchor_row, 0)` and fills columns left to
//! right. For the current column it scans rows in order and places at the
//! first safe row. When no row is safe it pops the previous column's queen
//! and resumes that column's scan from the row after the removed one.
//!
//! Each call to [`SearchEngine::step`] performs exactly one state change
//! (a placement, a removal, or a transition to a terminal phase), so a
//! caller can snapshot the board after every step.
//!
//! The anchor is never removed: when backtracking would need to pop column
//! 0, the search reports [`Phase::Terminated`].

use crate::error::ConfigError;
use crate::model::{BoardState, Phase, Snapshot};
use std::time::Duration;

/// Column holding the pinned anchor queen.
pub const ANCHOR_COLUMN: usize = 0;

/// Backtracking search state for one worker.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    worker_id: usize,
    anchor_row: usize,
    board: BoardState,
    /// `placements[col]` is the row of the queen in `col`; its length is the
    /// column pointer.
    placements: Vec<usize>,
    /// First row to try in the current column.
    resume_row: usize,
    phase: Phase,
    steps: u64,
}

impl SearchEngine {
    /// Create an engine with its anchor already placed (phase INITIAL).
    pub fn new(worker_id: usize, anchor_row: usize, size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidBoardSize(0));
        }
        if anchor_row >= size {
            return Err(ConfigError::StartRowOutOfRange {
                row: anchor_row,
                size,
            });
        }

        let mut board = BoardState::new(size);
        board.place(anchor_row, ANCHOR_COLUMN);

        Ok(Self {
            worker_id,
            anchor_row,
            board,
            placements: vec![anchor_row],
            resume_row: 0,
            phase: Phase::Initial,
            steps: 0,
        })
    }

    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    pub fn anchor_row(&self) -> usize {
        self.anchor_row
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the next column to fill.
    pub fn column(&self) -> usize {
        self.placements.len()
    }

    /// Number of steps taken since the initial placement.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Capture the current board.
    pub fn snapshot(&self, elapsed: Duration) -> Snapshot {
        Snapshot::new(self.worker_id, &self.board, self.steps, elapsed, self.phase)
    }

    /// Advance the search by one state change and return the new phase.
    /// Once a terminal phase is reached this is a no-op.
    pub fn step(&mut self) -> Phase {
        if self.is_finished() {
            return self.phase;
        }
        self.steps += 1;
        self.phase = self.advance();
        debug_assert!(self.board.is_consistent());
        self.phase
    }

    fn advance(&mut self) -> Phase {
        let n = self.board.size();
        let col = self.column();

        if col == n {
            return Phase::Solution;
        }

        let candidate = (self.resume_row..n).find(|&row| self.board.is_safe(row, col));
        if let Some(row) = candidate {
            self.board.place(row, col);
            self.placements.push(row);
            self.resume_row = 0;
            return Phase::Searching;
        }

        // Popping here would remove the anchor.
        if col <= ANCHOR_COLUMN + 1 {
            return Phase::Terminated;
        }

        match self.placements.pop() {
            Some(row) => {
                self.board.remove(row);
                self.resume_row = row + 1;
                Phase::Backtracking
            }
            None => Phase::Terminated,
        }
    }

    /// Step until a terminal phase, collecting every snapshot including the
    /// initial one. Intended for tests and offline use.
    pub fn run_to_completion(mut self) -> Vec<Snapshot> {
        let mut snapshots = vec![self.snapshot(Duration::ZERO)];
        while !self.is_finished() {
            self.step();
            snapshots.push(self.snapshot(Duration::ZERO));
        }
        snapshots
    }
}
