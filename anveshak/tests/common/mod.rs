//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use anveshak::{CellCoord, Grid, GridConfig};

pub fn init_logging() {
    env_logger::try_init().ok();
}

/// Fully known world with the given walls.
pub fn world(width: usize, height: usize, walls: &[CellCoord]) -> Arc<Grid> {
    Arc::new(Grid::ground_truth(width, height, walls, GridConfig::default()).unwrap())
}

/// Wall cells along the grid border.
pub fn border(width: usize, height: usize) -> Vec<CellCoord> {
    let mut walls = Vec::new();
    for x in 0..width {
        walls.push(CellCoord::new(x, 0));
        walls.push(CellCoord::new(x, height - 1));
    }
    for y in 1..height - 1 {
        walls.push(CellCoord::new(0, y));
        walls.push(CellCoord::new(width - 1, y));
    }
    walls
}

/// 6x7 bordered map whose only free cells form an L:
///
/// ```text
/// ######
/// #.####
/// #.####
/// #.####
/// #.####
/// #....#
/// ######
/// ```
pub fn l_corridor() -> Arc<Grid> {
    let free: HashSet<CellCoord> = (1..=5)
        .map(|y| CellCoord::new(1, y))
        .chain((2..=4).map(|x| CellCoord::new(x, 1)))
        .collect();
    let walls: Vec<CellCoord> = (0..7)
        .flat_map(|y| (0..6).map(move |x| CellCoord::new(x, y)))
        .filter(|c| !free.contains(c))
        .collect();
    world(6, 7, &walls)
}

/// Walkable cells 4-connected to `start`.
pub fn reachable(grid: &Grid, start: CellCoord) -> HashSet<CellCoord> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for next in grid.neighbors4(cell) {
            if grid.is_walkable(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}
