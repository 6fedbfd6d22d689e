//! Occupancy grid shared by exploration and localization.
//!
//! A [`Grid`] is a fixed-size, row-major array of [`Cell`]s. The same type
//! serves two roles:
//!
//! - **Ground truth**: every cell known, walls not walkable. Never mutated
//!   after construction.
//! - **Belief grid**: starts all-unknown and is revealed cell by cell as the
//!   explorer senses the world.
//!
//! # Coordinate Frame
//!
//! ```text
//!  y
//!  ▲
//!  │ (0,2) (1,2) (2,2)
//!  │ (0,1) (1,1) (2,1)
//!  │ (0,0) (1,0) (2,0)
//!  └──────────────────► x
//!  origin (bottom-left corner)
//! ```
//!
//! Cell `(x, y)` is stored at index `y * width + x`; its center lies at
//! `origin + ((x + 0.5) * cell_size, (y + 0.5) * cell_size)`.

mod config;

pub use config::GridConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{CellCoord, Point2D};

/// Grid access errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

/// Display classification of a cell.
///
/// Consumed by observers for rendering; never needed for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Unknown,
    Frontier,
    Free,
    Wall,
    Agent,
}

/// A single grid node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub coord: CellCoord,
    /// Whether the cell has been observed.
    pub known: bool,
    /// Whether the cell is free space (not an obstacle).
    pub walkable: bool,
    /// Known, walkable, and next to at least one unknown cell.
    ///
    /// Derived: recomputed by frontier detection each planning cycle.
    pub is_frontier: bool,
    /// World position of the cell center.
    pub position: Point2D,
}

impl Cell {
    /// Known and walkable: eligible for path search.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.known && self.walkable
    }

    /// Classification ignoring the agent.
    pub fn class(&self) -> CellClass {
        if !self.known {
            CellClass::Unknown
        } else if !self.walkable {
            CellClass::Wall
        } else if self.is_frontier {
            CellClass::Frontier
        } else {
            CellClass::Free
        }
    }
}

/// Up, down, right, left.
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Fixed-size rectangular occupancy grid.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size: f32,
    origin: Point2D,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a belief grid: every cell unknown and provisionally walkable.
    pub fn new(width: usize, height: usize, config: GridConfig) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let origin = config.resolve_origin(width, height);
        let cell_size = config.cell_size;
        let cells = (0..width * height)
            .map(|i| {
                let coord = CellCoord::new(i % width, i / width);
                Cell {
                    coord,
                    known: false,
                    walkable: true,
                    is_frontier: false,
                    position: Self::center_of(origin, cell_size, coord),
                }
            })
            .collect();

        Ok(Self {
            width,
            height,
            cell_size,
            origin,
            cells,
        })
    }

    /// Create a fully known grid with the given wall cells.
    pub fn ground_truth(
        width: usize,
        height: usize,
        walls: &[CellCoord],
        config: GridConfig,
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(width, height, config)?;
        for cell in &mut grid.cells {
            cell.known = true;
        }
        for &wall in walls {
            grid.mark_wall(wall)?;
        }
        Ok(grid)
    }

    /// Blank belief grid with this grid's shape and geometry.
    pub fn unknown_like(&self) -> Self {
        let mut grid = self.clone();
        for cell in &mut grid.cells {
            cell.known = false;
            cell.walkable = true;
            cell.is_frontier = false;
        }
        grid
    }

    fn center_of(origin: Point2D, cell_size: f32, coord: CellCoord) -> Point2D {
        Point2D::new(
            origin.x + (coord.x as f32 + 0.5) * cell_size,
            origin.y + (coord.y as f32 + 0.5) * cell_size,
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height) in cells.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Cell diameter in world units.
    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World position of the bottom-left corner.
    #[inline]
    pub fn origin(&self) -> Point2D {
        self.origin
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Flat storage index of a coordinate. Caller guarantees bounds.
    #[inline]
    pub fn index(&self, coord: CellCoord) -> usize {
        coord.y * self.width + coord.x
    }

    /// Coordinate of a flat storage index.
    #[inline]
    pub fn coord_of(&self, index: usize) -> CellCoord {
        CellCoord::new(index % self.width, index / self.width)
    }

    #[inline]
    pub fn get(&self, coord: CellCoord) -> Option<&Cell> {
        if self.contains(coord) {
            Some(&self.cells[self.index(coord)])
        } else {
            None
        }
    }

    fn get_mut(&mut self, coord: CellCoord) -> Result<&mut Cell, GridError> {
        if self.contains(coord) {
            let idx = self.index(coord);
            Ok(&mut self.cells[idx])
        } else {
            Err(GridError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Coordinate shifted by a signed step, if it stays inside the grid.
    #[inline]
    pub fn offset(&self, coord: CellCoord, dx: i32, dy: i32) -> Option<CellCoord> {
        coord
            .checked_offset(dx, dy)
            .filter(|&shifted| self.contains(shifted))
    }

    /// In bounds and walkable. Out-of-bounds is never legal.
    #[inline]
    pub fn is_walkable(&self, coord: CellCoord) -> bool {
        self.get(coord).is_some_and(|c| c.walkable)
    }

    /// Known and walkable.
    #[inline]
    pub fn is_open(&self, coord: CellCoord) -> bool {
        self.get(coord).is_some_and(Cell::is_open)
    }

    /// Nearest cell to a world position.
    ///
    /// Positions outside the grid clamp to the boundary cell; this never
    /// fails.
    pub fn cell_at(&self, world: Point2D) -> CellCoord {
        let extent_x = self.width as f32 * self.cell_size;
        let extent_y = self.height as f32 * self.cell_size;
        let px = ((world.x - self.origin.x) / extent_x).clamp(0.0, 1.0);
        let py = ((world.y - self.origin.y) / extent_y).clamp(0.0, 1.0);
        // NaN survives clamp; treat it as the low boundary
        let px = if px.is_nan() { 0.0 } else { px };
        let py = if py.is_nan() { 0.0 } else { py };

        let x = ((self.width - 1) as f32 * px).round() as usize;
        let y = ((self.height - 1) as f32 * py).round() as usize;
        CellCoord::new(x.min(self.width - 1), y.min(self.height - 1))
    }

    /// World position of a cell center. Coordinates need not be in bounds.
    #[inline]
    pub fn world_position(&self, coord: CellCoord) -> Point2D {
        Self::center_of(self.origin, self.cell_size, coord)
    }

    /// In-bounds 4-connected neighbors, ordered up, down, right, left.
    pub fn neighbors4(&self, coord: CellCoord) -> Vec<CellCoord> {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.offset(coord, dx, dy))
            .collect()
    }

    /// Mark a cell as observed free space.
    pub fn mark_free(&mut self, coord: CellCoord) -> Result<(), GridError> {
        let cell = self.get_mut(coord)?;
        cell.known = true;
        cell.walkable = true;
        cell.is_frontier = false;
        Ok(())
    }

    /// Mark a cell as an observed obstacle.
    pub fn mark_wall(&mut self, coord: CellCoord) -> Result<(), GridError> {
        let cell = self.get_mut(coord)?;
        cell.known = true;
        cell.walkable = false;
        cell.is_frontier = false;
        Ok(())
    }

    /// Forget a cell: back to unknown, provisionally walkable.
    pub fn mark_unknown(&mut self, coord: CellCoord) -> Result<(), GridError> {
        let cell = self.get_mut(coord)?;
        cell.known = false;
        cell.walkable = true;
        cell.is_frontier = false;
        Ok(())
    }

    pub fn set_frontier(&mut self, coord: CellCoord, is_frontier: bool) -> Result<(), GridError> {
        self.get_mut(coord)?.is_frontier = is_frontier;
        Ok(())
    }

    /// Number of known cells.
    pub fn known_count(&self) -> usize {
        self.cells.iter().filter(|c| c.known).count()
    }

    /// Coordinates of every walkable cell, in storage order.
    pub fn walkable_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().filter(|c| c.walkable).map(|c| c.coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
