//! Frontier detection and target ordering.
//!
//! A frontier is a known, walkable cell with at least one unknown
//! 4-neighbor: the edge of what the agent has seen.

use crate::core::{CellCoord, Point2D};
use crate::grid::{Grid, GridError};

/// Recompute `is_frontier` for every cell and return the frontier cells.
///
/// Cells that are not known and walkable are never frontiers.
pub fn detect_frontiers(grid: &mut Grid) -> Result<Vec<CellCoord>, GridError> {
    let mut frontiers = Vec::new();

    for idx in 0..grid.len() {
        let coord = grid.coord_of(idx);
        let is_frontier = grid.is_open(coord)
            && grid
                .neighbors4(coord)
                .into_iter()
                .any(|n| grid.get(n).is_some_and(|c| !c.known));

        grid.set_frontier(coord, is_frontier)?;
        if is_frontier {
            frontiers.push(coord);
        }
    }

    Ok(frontiers)
}

/// Orders frontier candidates and remembers the last target.
///
/// A cell that keeps re-qualifying as a frontier would otherwise be chosen
/// again and again; the selector drops the previous target from the front
/// of the list whenever there is an alternative.
#[derive(Debug, Clone, Default)]
pub struct FrontierSelector {
    last_target: Option<CellCoord>,
}

impl FrontierSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The previously chosen nearest frontier.
    pub fn last_target(&self) -> Option<CellCoord> {
        self.last_target
    }

    pub fn reset(&mut self) {
        self.last_target = None;
    }

    /// Sort candidates nearest-first from `agent` and apply the
    /// previous-target skip. Remembers the new head of the list.
    pub fn select(
        &mut self,
        grid: &Grid,
        agent: Point2D,
        mut frontiers: Vec<CellCoord>,
    ) -> Vec<CellCoord> {
        frontiers.sort_by(|a, b| {
            let da = grid.world_position(*a).distance_squared(&agent);
            let db = grid.world_position(*b).distance_squared(&agent);
            da.total_cmp(&db)
        });

        if frontiers.len() > 1 && frontiers.first().copied() == self.last_target {
            log::debug!(
                "Skipping repeated frontier target {:?}",
                self.last_target
            );
            frontiers.remove(0);
        }

        self.last_target = frontiers.first().copied();
        frontiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;

    fn belief(w: usize, h: usize) -> Grid {
        Grid::new(w, h, GridConfig::default()).unwrap()
    }

    #[test]
    fn test_detect_marks_edge_of_known_region() {
        let mut grid = belief(4, 1);
        grid.mark_free(CellCoord::new(0, 0)).unwrap();
        grid.mark_free(CellCoord::new(1, 0)).unwrap();

        let frontiers = detect_frontiers(&mut grid).unwrap();
        assert_eq!(frontiers, vec![CellCoord::new(1, 0)]);
        assert!(grid.get(CellCoord::new(1, 0)).unwrap().is_frontier);
        assert!(!grid.get(CellCoord::new(0, 0)).unwrap().is_frontier);
    }

    #[test]
    fn test_walls_and_unknown_are_never_frontiers() {
        let mut grid = belief(3, 1);
        grid.mark_wall(CellCoord::new(1, 0)).unwrap();

        let frontiers = detect_frontiers(&mut grid).unwrap();
        assert!(frontiers.is_empty());
        assert!(grid.iter().all(|c| !c.is_frontier));
    }

    #[test]
    fn test_flag_cleared_once_surroundings_known() {
        let mut grid = belief(2, 1);
        grid.mark_free(CellCoord::new(0, 0)).unwrap();
        assert_eq!(detect_frontiers(&mut grid).unwrap().len(), 1);

        grid.mark_free(CellCoord::new(1, 0)).unwrap();
        assert!(detect_frontiers(&mut grid).unwrap().is_empty());
        assert!(grid.iter().all(|c| !c.is_frontier));
    }

    #[test]
    fn test_frontier_invariant_holds() {
        let mut grid = belief(5, 5);
        for (x, y) in [(0, 0), (1, 0), (2, 0), (1, 1), (2, 2)] {
            grid.mark_free(CellCoord::new(x, y)).unwrap();
        }
        grid.mark_wall(CellCoord::new(0, 1)).unwrap();
        detect_frontiers(&mut grid).unwrap();

        for cell in grid.iter() {
            let expected = cell.is_open()
                && grid
                    .neighbors4(cell.coord)
                    .iter()
                    .any(|n| !grid.get(*n).unwrap().known);
            assert_eq!(cell.is_frontier, expected, "cell {}", cell.coord);
        }
    }

    #[test]
    fn test_select_sorts_by_distance() {
        let grid = belief(10, 1);
        let agent = grid.world_position(CellCoord::new(0, 0));
        let mut selector = FrontierSelector::new();

        let ordered = selector.select(
            &grid,
            agent,
            vec![CellCoord::new(7, 0), CellCoord::new(2, 0), CellCoord::new(5, 0)],
        );
        assert_eq!(
            ordered,
            vec![CellCoord::new(2, 0), CellCoord::new(5, 0), CellCoord::new(7, 0)]
        );
        assert_eq!(selector.last_target(), Some(CellCoord::new(2, 0)));
    }

    #[test]
    fn test_select_skips_repeated_target() {
        let grid = belief(10, 1);
        let agent = grid.world_position(CellCoord::new(0, 0));
        let mut selector = FrontierSelector::new();

        let first = selector.select(&grid, agent, vec![CellCoord::new(3, 0), CellCoord::new(6, 0)]);
        assert_eq!(first[0], CellCoord::new(3, 0));

        let second = selector.select(&grid, agent, vec![CellCoord::new(6, 0), CellCoord::new(3, 0)]);
        assert_eq!(second, vec![CellCoord::new(6, 0)]);
        assert_eq!(selector.last_target(), Some(CellCoord::new(6, 0)));
    }

    #[test]
    fn test_select_keeps_sole_repeated_target() {
        let grid = belief(10, 1);
        let agent = grid.world_position(CellCoord::new(0, 0));
        let mut selector = FrontierSelector::new();

        selector.select(&grid, agent, vec![CellCoord::new(4, 0)]);
        let again = selector.select(&grid, agent, vec![CellCoord::new(4, 0)]);
        assert_eq!(again, vec![CellCoord::new(4, 0)]);
    }
}
