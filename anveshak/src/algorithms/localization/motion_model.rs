//! Grid motion model for the particle filter.
//!
//! The agent moves one cell per step to a uniformly chosen walkable
//! 4-neighbor, first turning to face it. Particles replay the same motion
//! in their own frame: rotate by the agent's heading change, then advance
//! one cell along their own heading.
//!
//! ```text
//!   agent: 0° -> 270°, steps +x        particle: 90° + 270° = 0°, steps +y
//!
//!                                               P'
//!        A ──► A'                               ▲
//!                                               P
//! ```

use rand::Rng;

use crate::core::math::{grid_step, heading_towards, normalize_heading};
use crate::core::CellCoord;
use crate::grid::Grid;

use super::LocalizationError;
use super::particle_filter::Particle;

/// One sampled agent move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentMotion {
    pub from: CellCoord,
    pub to: CellCoord,
    /// Heading after the move, facing the step direction.
    pub heading: f32,
    /// Heading change relative to the heading before the move.
    pub rotation: f32,
}

/// Noise-free cell-step motion model.
#[derive(Debug, Clone, Copy, Default)]
pub struct MotionModel;

impl MotionModel {
    pub fn new() -> Self {
        Self
    }

    /// Pick the agent's next cell uniformly among walkable 4-neighbors.
    ///
    /// # Errors
    /// `NoLegalMove` when the agent is boxed in.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        from: CellCoord,
        heading: f32,
        rng: &mut R,
    ) -> Result<AgentMotion, LocalizationError> {
        let options: Vec<CellCoord> = grid
            .neighbors4(from)
            .into_iter()
            .filter(|&c| grid.is_walkable(c))
            .collect();

        if options.is_empty() {
            return Err(LocalizationError::NoLegalMove { cell: from });
        }

        let to = options[rng.random_range(0..options.len())];
        let dx = to.x as f32 - from.x as f32;
        let dy = to.y as f32 - from.y as f32;
        let new_heading = heading_towards(dx, dy);

        Ok(AgentMotion {
            from,
            to,
            heading: new_heading,
            rotation: new_heading - heading,
        })
    }

    /// Replay `motion` on a particle.
    ///
    /// Returns `None` when the particle's step would leave the grid or
    /// enter a wall; such particles are discarded.
    pub fn apply(&self, grid: &Grid, particle: &Particle, motion: &AgentMotion) -> Option<Particle> {
        let heading = normalize_heading(particle.heading + motion.rotation);
        let (dx, dy) = grid_step(heading);
        let cell = grid.cell_at(particle.position);
        let target = grid.offset(cell, dx, dy)?;

        if !grid.is_walkable(target) {
            return None;
        }

        Some(Particle {
            position: grid.world_position(target),
            heading,
            weight: particle.weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn particle_at(grid: &Grid, x: usize, y: usize, heading: f32) -> Particle {
        Particle::new(grid.world_position(CellCoord::new(x, y)), heading)
    }

    #[test]
    fn test_sample_only_legal_neighbors() {
        // Only (1, 0) is open next to (0, 0)
        let grid = Grid::ground_truth(3, 3, &[CellCoord::new(0, 1)], GridConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let model = MotionModel::new();

        for _ in 0..20 {
            let motion = model.sample(&grid, CellCoord::new(0, 0), 0.0, &mut rng).unwrap();
            assert_eq!(motion.to, CellCoord::new(1, 0));
            assert_relative_eq!(motion.heading, 270.0, epsilon = 1e-4);
            assert_relative_eq!(motion.rotation, 270.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_sample_boxed_in_fails() {
        let walls = [CellCoord::new(1, 0), CellCoord::new(0, 1)];
        let grid = Grid::ground_truth(2, 2, &walls, GridConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let err = MotionModel::new()
            .sample(&grid, CellCoord::new(0, 0), 0.0, &mut rng)
            .unwrap_err();
        assert_eq!(err, LocalizationError::NoLegalMove { cell: CellCoord::new(0, 0) });
    }

    #[test]
    fn test_apply_moves_in_particle_frame() {
        let grid = Grid::ground_truth(5, 5, &[], GridConfig::default()).unwrap();
        let model = MotionModel::new();
        // Agent turned from 0° to 270° (now facing +x)
        let motion = AgentMotion {
            from: CellCoord::new(2, 2),
            to: CellCoord::new(3, 2),
            heading: 270.0,
            rotation: 270.0,
        };

        // Facing 90° (-x), so it ends up facing 0° (+y) and moves up
        let p = particle_at(&grid, 1, 1, 90.0);
        let moved = model.apply(&grid, &p, &motion).unwrap();
        assert_eq!(grid.cell_at(moved.position), CellCoord::new(1, 2));
        assert_relative_eq!(moved.heading, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_apply_discards_illegal_moves() {
        let grid = Grid::ground_truth(3, 3, &[CellCoord::new(1, 2)], GridConfig::default()).unwrap();
        let model = MotionModel::new();
        let straight = AgentMotion {
            from: CellCoord::new(0, 0),
            to: CellCoord::new(0, 1),
            heading: 0.0,
            rotation: 0.0,
        };

        // Into a wall
        assert!(model.apply(&grid, &particle_at(&grid, 1, 1, 0.0), &straight).is_none());
        // Off the grid
        assert!(model.apply(&grid, &particle_at(&grid, 0, 2, 0.0), &straight).is_none());
        // Legal
        assert!(model.apply(&grid, &particle_at(&grid, 0, 0, 0.0), &straight).is_some());
    }
}
