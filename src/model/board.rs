//! Board representation for a single worker's search
//!
//! The board is stored row-major: `queens[row]` holds the column of the
//! queen on that row, or `None` if the row is empty. One queen per row is
//! therefore guaranteed by the representation; columns and diagonals are
//! checked by [`BoardState::is_safe`].

use std::fmt;

/// Placement of queens on an N×N grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoardState {
    queens: Vec<Option<usize>>,
}

impl BoardState {
    /// Create an empty board of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            queens: vec![None; size],
        }
    }

    /// Board dimension N.
    pub fn size(&self) -> usize {
        self.queens.len()
    }

    /// Per-row occupied column.
    pub fn queens(&self) -> &[Option<usize>] {
        &self.queens
    }

    /// Column of the queen on `row`, if any.
    pub fn column_of(&self, row: usize) -> Option<usize> {
        self.queens.get(row).copied().flatten()
    }

    /// Row of the queen in `col`, if any.
    pub fn row_in_column(&self, col: usize) -> Option<usize> {
        self.queens.iter().position(|&c| c == Some(col))
    }

    /// Number of queens on the board.
    pub fn placed(&self) -> usize {
        self.queens.iter().filter(|c| c.is_some()).count()
    }

    /// Iterate occupied cells as `(row, col)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.queens
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.map(|c| (row, c)))
    }

    /// True when every row holds a queen.
    pub fn is_complete(&self) -> bool {
        self.queens.iter().all(Option::is_some)
    }

    /// Put a queen at `(row, col)`, replacing whatever was on that row.
    pub fn place(&mut self, row: usize, col: usize) {
        debug_assert!(col < self.size());
        self.queens[row] = Some(col);
    }

    /// Clear `row`, returning the column that was occupied.
    pub fn remove(&mut self, row: usize) -> Option<usize> {
        self.queens[row].take()
    }

    /// Whether a queen at `(row, col)` would be attacked by any queen
    /// already on the board (shared row, column, or diagonal).
    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        self.occupied()
            .all(|(r, c)| r != row && c != col && r.abs_diff(row) != c.abs_diff(col))
    }

    /// Check the non-attacking invariant over all occupied cells.
    pub fn is_consistent(&self) -> bool {
        queens_consistent(&self.queens)
    }
}

/// Check that no two occupied entries share a column or a diagonal, and that
/// every occupied column lies on the board.
pub fn queens_consistent(queens: &[Option<usize>]) -> bool {
    let n = queens.len();
    let cells: Vec<(usize, usize)> = queens
        .iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|c| (row, c)))
        .collect();

    if cells.iter().any(|&(_, c)| c >= n) {
        return false;
    }

    cells.iter().enumerate().all(|(i, &(r1, c1))| {
        cells[i + 1..]
            .iter()
            .all(|&(r2, c2)| c1 != c2 && r1.abs_diff(r2) != c1.abs_diff(c2))
    })
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size();
        for col in self.queens.iter() {
            let line: String = (0..n)
                .map(|c| if *col == Some(c) { 'Q' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl From<Vec<Option<usize>>> for BoardState {
    fn from(queens: Vec<Option<usize>>) -> Self {
        Self { queens }
    }
}
