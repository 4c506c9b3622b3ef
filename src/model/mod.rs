//! Board, snapshot, and color data shared by workers and consumers

pub mod board;
pub mod color;
pub mod snapshot;

pub use board::{BoardState, queens_consistent};
pub use color::{Color, ColorAssignment, worker_color};
pub use snapshot::{Phase, Snapshot};
