//! Exploration state machine.
//!
//! One [`Explorer::step`] runs a full Scan, Plan, Traverse cycle over the
//! agent's private belief grid. The ground-truth grid is consulted only to
//! classify cells the sensor reports.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::algorithms::planning::{AStarPlanner, GridPath, PlanningError};
use crate::core::math::sweep_headings;
use crate::core::{CellCoord, direction_from_heading};
use crate::error::{ConfigError, Result};
use crate::events::{Completion, SimulationObserver};
use crate::grid::{Cell, CellClass, Grid, GridError};
use crate::sensors::{GridRaycaster, RangeSensor};

use super::frontier::{FrontierSelector, detect_frontiers};

/// Configuration for exploration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplorationConfig {
    /// Rays per full scan sweep, evenly spaced over 360°.
    #[serde(default = "default_scan_headings")]
    pub scan_headings: usize,

    /// Sensor range in world units.
    #[serde(default = "default_max_range")]
    pub max_range: f32,
}

fn default_scan_headings() -> usize {
    360
}

fn default_max_range() -> f32 {
    5.0
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            scan_headings: default_scan_headings(),
            max_range: default_max_range(),
        }
    }
}

impl ExplorationConfig {
    /// Sensor that sees the whole grid in one sweep.
    pub fn unlimited() -> Self {
        Self {
            max_range: f32::MAX,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.scan_headings == 0 {
            return Err(ConfigError::Invalid(
                "exploration.scan_headings must be positive".into(),
            ));
        }
        if self.max_range.is_nan() || self.max_range <= 0.0 {
            return Err(ConfigError::Invalid(
                "exploration.max_range must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Phase of the exploration cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorationState {
    Scanning,
    Planning,
    Traversing,
    /// No frontiers remain. Terminal.
    Done,
}

/// What the planning phase of a cycle decided.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Moved along a path to a frontier.
    ///
    /// When the agent already stands on the chosen frontier the path holds
    /// only the start cell (`path.steps() == 0`) and the agent stays put.
    /// The next scan from there resolves the frontier.
    Moved { target: CellCoord, path: GridPath },
    /// Every frontier candidate was unreachable. The next tick scans again.
    NoPath,
    /// The frontier set was empty; exploration is complete.
    NoFrontiers,
}

/// Report for one exploration tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationStep {
    /// Cells that became known during this tick's scan.
    pub revealed: usize,
    /// Frontier cells found before planning.
    pub frontiers: usize,
    pub outcome: PlanOutcome,
    /// State after the tick.
    pub state: ExplorationState,
}

/// Cumulative exploration counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorationStats {
    pub scans: u64,
    pub cells_revealed: u64,
    /// Cells moved through.
    pub cells_travelled: u64,
    /// Ticks where no frontier was reachable.
    pub failed_plans: u64,
}

/// Frontier-exploring agent.
pub struct Explorer<S = GridRaycaster> {
    config: ExplorationConfig,
    world: Arc<Grid>,
    belief: Grid,
    sensor: S,
    agent: CellCoord,
    state: ExplorationState,
    selector: FrontierSelector,
    planner: AStarPlanner,
    stats: ExplorationStats,
    /// Last class published per cell.
    published: Vec<CellClass>,
    finished_notified: bool,
}

impl Explorer<GridRaycaster> {
    /// Explorer sensing `world` through a simulated ray caster.
    pub fn simulated(world: Arc<Grid>, start: CellCoord, config: ExplorationConfig) -> Result<Self> {
        let sensor = GridRaycaster::new(world.clone());
        Self::new(world, sensor, start, config)
    }
}

impl<S: RangeSensor> Explorer<S> {
    /// Create an explorer at `start` with a blank belief grid.
    ///
    /// The start cell is marked known and free.
    pub fn new(
        world: Arc<Grid>,
        sensor: S,
        start: CellCoord,
        config: ExplorationConfig,
    ) -> Result<Self> {
        config.validate()?;
        if !world.contains(start) {
            return Err(GridError::OutOfBounds {
                x: start.x,
                y: start.y,
                width: world.width(),
                height: world.height(),
            }
            .into());
        }
        if !world.is_walkable(start) {
            return Err(ConfigError::Invalid(format!("start cell {} is a wall", start)).into());
        }

        let mut belief = world.unknown_like();
        belief.mark_free(start)?;

        let mut published = vec![CellClass::Unknown; belief.len()];
        published[belief.index(start)] = CellClass::Agent;

        log::info!(
            "Explorer created: {}x{} grid, start {}, range {}",
            world.width(),
            world.height(),
            start,
            config.max_range
        );

        Ok(Self {
            config,
            world,
            belief,
            sensor,
            agent: start,
            state: ExplorationState::Scanning,
            selector: FrontierSelector::new(),
            planner: AStarPlanner::new(),
            stats: ExplorationStats::default(),
            published,
            finished_notified: false,
        })
    }

    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    /// The agent's belief grid.
    pub fn belief(&self) -> &Grid {
        &self.belief
    }

    /// Ground truth the sensor reports against.
    pub fn world(&self) -> &Grid {
        &self.world
    }

    /// Agent's current cell.
    pub fn agent(&self) -> CellCoord {
        self.agent
    }

    pub fn state(&self) -> ExplorationState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ExplorationState::Done
    }

    pub fn stats(&self) -> &ExplorationStats {
        &self.stats
    }

    /// Previously chosen frontier target.
    pub fn last_frontier(&self) -> Option<CellCoord> {
        self.selector.last_target()
    }

    /// Fraction of belief cells that are known.
    pub fn coverage(&self) -> f32 {
        self.belief.known_count() as f32 / self.belief.len() as f32
    }

    /// Display class of a belief cell.
    pub fn classify(&self, coord: CellCoord) -> CellClass {
        if coord == self.agent {
            return CellClass::Agent;
        }
        self.belief
            .get(coord)
            .map(Cell::class)
            .unwrap_or(CellClass::Unknown)
    }

    /// Run one Scan, Plan, Traverse cycle.
    ///
    /// After `Done` this is a no-op that keeps reporting `NoFrontiers`.
    pub fn step(&mut self, observer: &mut dyn SimulationObserver) -> Result<ExplorationStep> {
        if self.is_done() {
            return Ok(ExplorationStep {
                revealed: 0,
                frontiers: 0,
                outcome: PlanOutcome::NoFrontiers,
                state: self.state,
            });
        }

        self.state = ExplorationState::Scanning;
        let revealed = self.scan()?;

        self.state = ExplorationState::Planning;
        let frontiers = detect_frontiers(&mut self.belief)?;
        self.publish_changes(observer);
        let frontier_count = frontiers.len();

        if frontiers.is_empty() {
            self.state = ExplorationState::Done;
            log::info!(
                "Exploration complete: {} scans, {} cells travelled, coverage {:.1}%",
                self.stats.scans,
                self.stats.cells_travelled,
                self.coverage() * 100.0
            );
            if !self.finished_notified {
                self.finished_notified = true;
                observer.on_finished(Completion::MappingComplete);
            }
            return Ok(ExplorationStep {
                revealed,
                frontiers: 0,
                outcome: PlanOutcome::NoFrontiers,
                state: self.state,
            });
        }

        let agent_pos = self.belief.world_position(self.agent);
        let candidates = self.selector.select(&self.belief, agent_pos, frontiers);

        let outcome = match self
            .planner
            .find_path_to_any(&self.belief, self.agent, &candidates)
        {
            Ok((i, path)) => {
                let target = candidates[i];
                log::debug!(
                    "Path to frontier {} ({} steps, {} frontiers)",
                    target,
                    path.steps(),
                    frontier_count
                );
                self.state = ExplorationState::Traversing;
                self.traverse(&path, observer)?;
                PlanOutcome::Moved { target, path }
            }
            Err(PlanningError::NoPathFound) => {
                self.stats.failed_plans += 1;
                log::warn!(
                    "No reachable frontier among {} candidates from {}",
                    candidates.len(),
                    self.agent
                );
                PlanOutcome::NoPath
            }
            Err(e) => return Err(e.into()),
        };

        self.state = ExplorationState::Scanning;
        Ok(ExplorationStep {
            revealed,
            frontiers: frontier_count,
            outcome,
            state: self.state,
        })
    }

    /// Sweep the sensor through a full turn and reveal what it reports.
    ///
    /// Each ray marks cells nearest-first and stops at the first wall.
    fn scan(&mut self) -> Result<usize> {
        let before = self.belief.known_count();
        let origin = self.belief.world_position(self.agent);

        for heading in sweep_headings(self.config.scan_headings) {
            let direction = direction_from_heading(heading);
            for hit in self.sensor.hits(origin, direction, self.config.max_range) {
                let truth = self.world.cell_at(hit.position);
                let cell = self.belief.cell_at(hit.position);
                if self.world.is_walkable(truth) {
                    self.belief.mark_free(cell)?;
                } else {
                    self.belief.mark_wall(cell)?;
                    break;
                }
            }
        }
        self.belief.mark_free(self.agent)?;

        let revealed = self.belief.known_count() - before;
        self.stats.scans += 1;
        self.stats.cells_revealed += revealed as u64;
        log::trace!("Scan from {} revealed {} cells", self.agent, revealed);
        Ok(revealed)
    }

    /// Move the agent cell by cell along `path`.
    fn traverse(&mut self, path: &GridPath, observer: &mut dyn SimulationObserver) -> Result<()> {
        for &next in path.cells() {
            if next == self.agent {
                continue;
            }
            let previous = self.agent;
            self.belief.mark_free(previous)?;
            self.agent = next;
            self.stats.cells_travelled += 1;

            self.publish(previous, observer);
            self.publish(next, observer);
        }
        Ok(())
    }

    fn publish(&mut self, coord: CellCoord, observer: &mut dyn SimulationObserver) {
        let class = self.classify(coord);
        let idx = self.belief.index(coord);
        if self.published[idx] != class {
            self.published[idx] = class;
            observer.on_cell_changed(coord, class);
        }
    }

    /// Notify the observer of every cell whose class changed.
    fn publish_changes(&mut self, observer: &mut dyn SimulationObserver) {
        for idx in 0..self.belief.len() {
            let coord = self.belief.coord_of(idx);
            self.publish(coord, observer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Point2D;
    use crate::events::{NullObserver, RecordingObserver};
    use crate::grid::GridConfig;
    use crate::sensors::RayHit;

    fn world(w: usize, h: usize, walls: &[CellCoord]) -> Arc<Grid> {
        Arc::new(Grid::ground_truth(w, h, walls, GridConfig::default()).unwrap())
    }

    #[test]
    fn test_open_5x5_done_after_one_scan() {
        let mut explorer =
            Explorer::simulated(world(5, 5, &[]), CellCoord::new(2, 2), ExplorationConfig::default())
                .unwrap();
        let mut obs = RecordingObserver::new();

        let step = explorer.step(&mut obs).unwrap();
        assert_eq!(step.revealed, 24);
        assert_eq!(step.outcome, PlanOutcome::NoFrontiers);
        assert_eq!(explorer.state(), ExplorationState::Done);
        assert_eq!(explorer.belief().known_count(), 25);
        assert_eq!(explorer.stats().scans, 1);
        assert_eq!(obs.completions, vec![Completion::MappingComplete]);
    }

    #[test]
    fn test_scan_stops_at_first_wall() {
        let mut explorer = Explorer::simulated(
            world(5, 1, &[CellCoord::new(2, 0)]),
            CellCoord::new(0, 0),
            ExplorationConfig::unlimited(),
        )
        .unwrap();

        explorer.step(&mut NullObserver).unwrap();
        let belief = explorer.belief();
        assert_eq!(explorer.classify(CellCoord::new(2, 0)), CellClass::Wall);
        assert!(!belief.get(CellCoord::new(3, 0)).unwrap().known);
        assert!(!belief.get(CellCoord::new(4, 0)).unwrap().known);
        // Nothing reachable is unknown
        assert!(explorer.is_done());
    }

    #[test]
    fn test_limited_range_moves_toward_frontier() {
        let config = ExplorationConfig {
            max_range: 2.0,
            ..Default::default()
        };
        let mut explorer =
            Explorer::simulated(world(8, 1, &[]), CellCoord::new(0, 0), config).unwrap();

        let step = explorer.step(&mut NullObserver).unwrap();
        assert_eq!(step.frontiers, 1);
        match step.outcome {
            PlanOutcome::Moved { target, path } => {
                assert_eq!(target, CellCoord::new(2, 0));
                assert_eq!(path.steps(), 2);
            }
            other => panic!("expected a move, got {:?}", other),
        }
        assert_eq!(explorer.agent(), CellCoord::new(2, 0));
        assert_eq!(explorer.state(), ExplorationState::Scanning);
        assert_eq!(explorer.stats().cells_travelled, 2);
    }

    #[test]
    fn test_step_after_done_is_noop() {
        let mut explorer =
            Explorer::simulated(world(3, 3, &[]), CellCoord::new(1, 1), ExplorationConfig::default())
                .unwrap();
        let mut obs = RecordingObserver::new();
        explorer.step(&mut obs).unwrap();
        let again = explorer.step(&mut obs).unwrap();

        assert_eq!(again.outcome, PlanOutcome::NoFrontiers);
        assert_eq!(explorer.stats().scans, 1);
        assert_eq!(obs.completions.len(), 1);
    }

    #[test]
    fn test_start_validation() {
        let w = world(3, 3, &[CellCoord::new(1, 1)]);
        assert!(Explorer::simulated(w.clone(), CellCoord::new(1, 1), ExplorationConfig::default()).is_err());
        assert!(Explorer::simulated(w.clone(), CellCoord::new(3, 0), ExplorationConfig::default()).is_err());

        let bad = ExplorationConfig {
            scan_headings: 0,
            ..Default::default()
        };
        assert!(Explorer::simulated(w, CellCoord::new(0, 0), bad).is_err());
    }

    #[test]
    fn test_classify_reports_agent_and_unknown() {
        let explorer =
            Explorer::simulated(world(4, 4, &[]), CellCoord::new(0, 0), ExplorationConfig::default())
                .unwrap();
        assert_eq!(explorer.classify(CellCoord::new(0, 0)), CellClass::Agent);
        assert_eq!(explorer.classify(CellCoord::new(3, 3)), CellClass::Unknown);
        assert_eq!(explorer.classify(CellCoord::new(9, 9)), CellClass::Unknown);
        assert_eq!(explorer.coverage(), 1.0 / 16.0);
    }

    #[test]
    fn test_observer_sees_wall_and_agent_moves() {
        let config = ExplorationConfig {
            max_range: 1.0,
            ..Default::default()
        };
        let mut explorer =
            Explorer::simulated(world(5, 1, &[CellCoord::new(4, 0)]), CellCoord::new(0, 0), config)
                .unwrap();
        let mut obs = RecordingObserver::new();

        for _ in 0..10 {
            if explorer.step(&mut obs).unwrap().state == ExplorationState::Done {
                break;
            }
        }
        assert!(explorer.is_done());
        assert_eq!(obs.last_class(CellCoord::new(4, 0)), Some(CellClass::Wall));
        assert_eq!(obs.last_class(CellCoord::new(0, 0)), Some(CellClass::Free));
        assert_eq!(obs.last_class(explorer.agent()), Some(CellClass::Agent));
    }

    /// Reports one fixed cell on every ray, regardless of walls in between.
    struct IslandSensor {
        world: Arc<Grid>,
        island: CellCoord,
    }

    impl RangeSensor for IslandSensor {
        fn hits(&self, origin: Point2D, _direction: Point2D, _max_range: f32) -> Vec<RayHit> {
            let position = self.world.world_position(self.island);
            vec![RayHit {
                distance: origin.distance(&position),
                position,
                cell: self.island,
            }]
        }

        fn first_hit(&self, _origin: Point2D, _direction: Point2D, _max_range: f32) -> Option<f32> {
            None
        }
    }

    #[test]
    fn test_unreachable_frontier_reports_no_path() {
        let truth = world(6, 1, &[]);
        let sensor = IslandSensor {
            world: truth.clone(),
            island: CellCoord::new(3, 0),
        };
        let start = CellCoord::new(0, 0);
        let mut explorer =
            Explorer::new(truth, sensor, start, ExplorationConfig::default()).unwrap();
        let mut obs = NullObserver;

        // Nearest frontier is the agent's own cell: a zero-step move
        let step = explorer.step(&mut obs).unwrap();
        assert_eq!(step.revealed, 1);
        assert_eq!(step.frontiers, 2);
        match &step.outcome {
            PlanOutcome::Moved { target, path } => {
                assert_eq!(*target, start);
                assert_eq!(path.cells(), &[start]);
                assert_eq!(path.steps(), 0);
            }
            other => panic!("expected a zero-step move, got {:?}", other),
        }
        assert_eq!(explorer.stats().failed_plans, 0);

        // The last target is skipped, leaving only the island
        let step = explorer.step(&mut obs).unwrap();
        assert_eq!(step.outcome, PlanOutcome::NoPath);
        assert_eq!(step.state, ExplorationState::Scanning);
        assert_eq!(explorer.stats().failed_plans, 1);
        assert_eq!(explorer.agent(), start);
        assert_eq!(explorer.last_frontier(), Some(CellCoord::new(3, 0)));
        assert!(!explorer.is_done());

        // Not fatal: the next tick plans again
        let step = explorer.step(&mut obs).unwrap();
        assert!(matches!(step.outcome, PlanOutcome::Moved { .. }));
        assert_eq!(explorer.stats().failed_plans, 1);
    }
}
