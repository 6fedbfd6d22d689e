//! Path planning over the grid.
//!
//! [`AStarPlanner`] searches 4-connected, known, walkable cells and
//! returns a [`GridPath`] of cell coordinates.

mod astar;

pub use astar::{AStarPlanner, SearchStats};

use thiserror::Error;

use crate::core::CellCoord;

/// Error types for path planning.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    /// No path found to target.
    #[error("No path found to target")]
    NoPathFound,

    /// Start cell is outside the grid.
    #[error("Start cell {0} is outside the grid")]
    StartOutOfBounds(CellCoord),

    /// Goal cell is outside the grid.
    #[error("Goal cell {0} is outside the grid")]
    GoalOutOfBounds(CellCoord),
}

/// A path as a sequence of adjacent cells, start cell included.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridPath {
    cells: Vec<CellCoord>,
}

impl GridPath {
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of moves (cells minus the start cell).
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        self.cells.contains(&coord)
    }
}

impl IntoIterator for GridPath {
    type Item = CellCoord;
    type IntoIter = std::vec::IntoIter<CellCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
