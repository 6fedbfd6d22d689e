//! A* search on the belief grid.
//!
//! Only known, walkable cells are expanded; the agent never plans through
//! territory it has not observed. Connectivity is 4-way.
//!
//! The priority of a newly discovered cell is
//! `distance(cell, goal) + cell_diameter`. This is not an admissible
//! heuristic and the search does not relax costs: the first parent found
//! for a cell is kept. On open grids the result is still a monotone
//! (Manhattan-length) path.
//!
//! Search state (closed set, parent links) lives in flat arrays indexed by
//! `y * width + x` and is allocated per search, so consecutive searches
//! cannot see each other's state.

use std::cmp::Ordering;

use crate::collections::MinHeap;
use crate::core::CellCoord;
use crate::grid::Grid;

use super::{GridPath, PlanningError};

/// Heap entry: priority plus flat cell index.
#[derive(Debug, Clone, Copy)]
struct ScoredCell {
    cost: f32,
    index: usize,
}

impl PartialEq for ScoredCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredCell {}

impl PartialOrd for ScoredCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredCell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Counters from the most recent search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Cells popped and closed.
    pub expanded: usize,
    /// Cells pushed onto the open queue (start included).
    pub queued: usize,
    /// Goals attempted by the last `find_path_to_any` call.
    pub attempts: usize,
}

/// A* planner over [`Grid`] cells.
#[derive(Debug, Default)]
pub struct AStarPlanner {
    stats: SearchStats,
}

impl AStarPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters from the most recent search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Plan from `start` to `goal`.
    ///
    /// # Returns
    /// * `Ok(GridPath)` - path including both endpoints
    /// * `Err(PlanningError::NoPathFound)` - goal unreachable through open cells
    pub fn find_path(
        &mut self,
        grid: &Grid,
        start: CellCoord,
        goal: CellCoord,
    ) -> Result<GridPath, PlanningError> {
        self.stats = SearchStats {
            attempts: 1,
            ..Default::default()
        };
        self.search(grid, start, goal)
    }

    /// Plan to the first reachable goal in `goals`, trying them in order.
    ///
    /// Returns the index of the goal reached alongside the path. Each
    /// unreachable goal is skipped and the next one tried; only when every
    /// goal is exhausted does this fail with `NoPathFound`.
    pub fn find_path_to_any(
        &mut self,
        grid: &Grid,
        start: CellCoord,
        goals: &[CellCoord],
    ) -> Result<(usize, GridPath), PlanningError> {
        self.stats = SearchStats::default();

        for (i, &goal) in goals.iter().enumerate() {
            self.stats.attempts += 1;
            match self.search(grid, start, goal) {
                Ok(path) => return Ok((i, path)),
                Err(PlanningError::NoPathFound) => {
                    log::debug!("No path from {} to {}, trying next goal", start, goal);
                }
                Err(e) => return Err(e),
            }
        }

        Err(PlanningError::NoPathFound)
    }

    fn search(
        &mut self,
        grid: &Grid,
        start: CellCoord,
        goal: CellCoord,
    ) -> Result<GridPath, PlanningError> {
        if !grid.contains(start) {
            return Err(PlanningError::StartOutOfBounds(start));
        }
        if !grid.contains(goal) {
            return Err(PlanningError::GoalOutOfBounds(goal));
        }

        let start_idx = grid.index(start);
        let goal_idx = grid.index(goal);
        let goal_pos = grid.world_position(goal);
        let diameter = grid.cell_size();

        let mut closed = vec![false; grid.len()];
        let mut parent: Vec<Option<usize>> = vec![None; grid.len()];
        let mut open = MinHeap::new();

        open.insert(ScoredCell {
            cost: 0.0,
            index: start_idx,
        });
        self.stats.queued += 1;

        while let Some(current) = open.extract_min() {
            if closed[current.index] {
                continue;
            }
            closed[current.index] = true;
            self.stats.expanded += 1;

            if current.index == goal_idx {
                return Ok(Self::reconstruct_path(grid, &parent, start_idx, goal_idx));
            }

            for neighbor in grid.neighbors4(grid.coord_of(current.index)) {
                let idx = grid.index(neighbor);
                if !grid.is_open(neighbor) || closed[idx] || parent[idx].is_some() {
                    continue;
                }

                parent[idx] = Some(current.index);
                open.insert(ScoredCell {
                    cost: grid.world_position(neighbor).distance(&goal_pos) + diameter,
                    index: idx,
                });
                self.stats.queued += 1;
            }
        }

        Err(PlanningError::NoPathFound)
    }

    /// Walk parent links back from the goal and reverse.
    fn reconstruct_path(
        grid: &Grid,
        parent: &[Option<usize>],
        start_idx: usize,
        goal_idx: usize,
    ) -> GridPath {
        let mut cells = vec![grid.coord_of(goal_idx)];
        let mut idx = goal_idx;

        while idx != start_idx {
            match parent[idx] {
                Some(prev) => {
                    cells.push(grid.coord_of(prev));
                    idx = prev;
                }
                None => break,
            }
        }

        cells.reverse();
        GridPath::new(cells)
    }
}
