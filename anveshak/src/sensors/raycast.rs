//! Grid ray casting.
//!
//! Uses the Amanatides-Woo voxel traversal: the ray steps one axis at a
//! time into whichever neighboring cell boundary it reaches first, so every
//! crossed cell is visited exactly once and consecutive cells are
//! 4-connected.
//!
//! ```text
//!   ┌───┬───┬───┬───┐
//!   │   │   │ 4 │ 5 │
//!   ├───┼───┼───┼───┤
//!   │   │ 2 │ 3 │   │      origin in 1, ray heading up-right
//!   ├───┼───┼───┼───┤
//!   │ 1 │   │   │   │
//!   └───┴───┴───┴───┘
//! ```

use std::sync::Arc;

use crate::core::{CellCoord, Point2D};
use crate::grid::Grid;

use super::{RangeSensor, RayHit};

const PARALLEL_EPS: f32 = 1e-9;

/// Iterator over `(cell, entry distance)` pairs along a ray.
///
/// Stops at `max_range` or when the ray leaves the grid. A ray starting
/// outside the grid yields nothing.
#[derive(Debug, Clone)]
pub struct GridTraversal {
    x: i64,
    y: i64,
    step_x: i64,
    step_y: i64,
    t_max_x: f32,
    t_max_y: f32,
    t_delta_x: f32,
    t_delta_y: f32,
    max_range: f32,
    width: i64,
    height: i64,
    done: bool,
}

impl GridTraversal {
    pub fn new(grid: &Grid, origin: Point2D, direction: Point2D, max_range: f32) -> Self {
        let cell_size = grid.cell_size();
        let local_x = (origin.x - grid.origin().x) / cell_size;
        let local_y = (origin.y - grid.origin().y) / cell_size;
        let x = local_x.floor() as i64;
        let y = local_y.floor() as i64;

        let (step_x, t_max_x, t_delta_x) = Self::axis_setup(local_x, x, direction.x, cell_size);
        let (step_y, t_max_y, t_delta_y) = Self::axis_setup(local_y, y, direction.y, cell_size);

        let width = grid.width() as i64;
        let height = grid.height() as i64;
        let inside = x >= 0 && y >= 0 && x < width && y < height;

        Self {
            x,
            y,
            step_x,
            step_y,
            t_max_x,
            t_max_y,
            t_delta_x,
            t_delta_y,
            max_range,
            width,
            height,
            done: !inside || !origin.x.is_finite() || !origin.y.is_finite(),
        }
    }

    /// Step direction, distance to the first boundary, distance per cell.
    fn axis_setup(local: f32, cell: i64, dir: f32, cell_size: f32) -> (i64, f32, f32) {
        if dir > PARALLEL_EPS {
            let to_boundary = (cell as f32 + 1.0 - local) * cell_size;
            (1, to_boundary / dir, cell_size / dir)
        } else if dir < -PARALLEL_EPS {
            let to_boundary = (local - cell as f32) * cell_size;
            (-1, to_boundary / -dir, cell_size / -dir)
        } else {
            (0, f32::INFINITY, f32::INFINITY)
        }
    }
}

impl Iterator for GridTraversal {
    type Item = (CellCoord, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let t = if self.t_max_x <= self.t_max_y {
            let t = self.t_max_x;
            self.x += self.step_x;
            self.t_max_x += self.t_delta_x;
            t
        } else {
            let t = self.t_max_y;
            self.y += self.step_y;
            self.t_max_y += self.t_delta_y;
            t
        };

        if t.is_nan()
            || t > self.max_range
            || self.x < 0
            || self.y < 0
            || self.x >= self.width
            || self.y >= self.height
        {
            self.done = true;
            return None;
        }

        Some((CellCoord::new(self.x as usize, self.y as usize), t))
    }
}

/// Simulated range sensor over a ground-truth grid.
///
/// Non-walkable cells obstruct rays. Leaving the grid is a miss.
#[derive(Debug, Clone)]
pub struct GridRaycaster {
    world: Arc<Grid>,
}

impl GridRaycaster {
    pub fn new(world: Arc<Grid>) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &Grid {
        &self.world
    }
}

impl RangeSensor for GridRaycaster {
    fn hits(&self, origin: Point2D, direction: Point2D, max_range: f32) -> Vec<RayHit> {
        GridTraversal::new(&self.world, origin, direction, max_range)
            .map(|(cell, distance)| RayHit {
                distance,
                position: self.world.world_position(cell),
                cell,
            })
            .collect()
    }

    fn first_hit(&self, origin: Point2D, direction: Point2D, max_range: f32) -> Option<f32> {
        GridTraversal::new(&self.world, origin, direction, max_range)
            .find(|(cell, _)| !self.world.is_walkable(*cell))
            .map(|(_, distance)| distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::direction_from_heading;
    use crate::grid::GridConfig;
    use approx::assert_relative_eq;

    fn corridor() -> Arc<Grid> {
        // 5x1 strip with a wall at the right end
        Arc::new(Grid::ground_truth(5, 1, &[CellCoord::new(4, 0)], GridConfig::default()).unwrap())
    }

    #[test]
    fn test_hits_are_ordered_and_skip_origin() {
        let world = corridor();
        let sensor = GridRaycaster::new(world.clone());
        let origin = world.world_position(CellCoord::new(0, 0));

        let hits = sensor.hits(origin, direction_from_heading(270.0), 10.0);
        let cells: Vec<usize> = hits.iter().map(|h| h.cell.x).collect();
        assert_eq!(cells, vec![1, 2, 3, 4]);
        assert_relative_eq!(hits[0].distance, 0.5, epsilon = 1e-5);
        assert_relative_eq!(hits[3].distance, 3.5, epsilon = 1e-5);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_max_range_limits_hits() {
        let world = corridor();
        let sensor = GridRaycaster::new(world.clone());
        let origin = world.world_position(CellCoord::new(0, 0));

        let hits = sensor.hits(origin, direction_from_heading(270.0), 2.0);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_first_hit_distance() {
        let world = corridor();
        let sensor = GridRaycaster::new(world.clone());
        let origin = world.world_position(CellCoord::new(1, 0));

        let d = sensor.first_hit(origin, direction_from_heading(270.0), 50.0);
        assert_relative_eq!(d.unwrap(), 2.5, epsilon = 1e-5);

        // Out of range
        assert_eq!(sensor.first_hit(origin, direction_from_heading(270.0), 2.0), None);
    }

    #[test]
    fn test_leaving_grid_is_a_miss() {
        let world = corridor();
        let sensor = GridRaycaster::new(world.clone());
        let origin = world.world_position(CellCoord::new(1, 0));

        assert_eq!(sensor.first_hit(origin, direction_from_heading(90.0), 50.0), None);
        assert_eq!(sensor.first_hit(origin, direction_from_heading(0.0), 50.0), None);
    }

    #[test]
    fn test_origin_outside_grid_yields_nothing() {
        let world = corridor();
        let sensor = GridRaycaster::new(world);
        let hits = sensor.hits(Point2D::new(-50.0, 0.0), Point2D::new(1.0, 0.0), 100.0);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_diagonal_traversal_is_4_connected() {
        let world = Grid::ground_truth(6, 6, &[], GridConfig::default()).unwrap();
        let origin = world.world_position(CellCoord::new(0, 0));
        let dir = direction_from_heading(300.0);

        let mut prev = world.cell_at(origin);
        for (cell, _) in GridTraversal::new(&world, origin, dir, 20.0) {
            assert_eq!(prev.manhattan(&cell), 1);
            prev = cell;
        }
        assert!(prev.x == 5 || prev.y == 5);
    }
}
