//! Particle filter (Monte Carlo Localization) implementation.
//!
//! Each step runs the full MCL cycle:
//!
//! 1. Sample the agent's move to a random walkable neighbor
//! 2. Replay the move on every particle, discarding illegal ones
//! 3. Give survivors a uniform prior of `1 / distinct occupied cells`
//! 4. Weight by the sensor model (real vs. simulated range reading)
//! 5. Rejection-resample back to the fixed population size
//! 6. Converged once every particle shares one cell
//!
//! The population is seeded with one particle per walkable cell per
//! cardinal heading, so it covers every pose the agent could be in.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::{CellCoord, Point2D, direction_from_heading, normalize_heading};
use crate::error::{ConfigError, Result};
use crate::events::{CellMass, Completion, SimulationObserver};
use crate::grid::{Grid, GridError};
use crate::sensors::{GridRaycaster, RangeSensor};

use super::LocalizationError;
use super::motion_model::{AgentMotion, MotionModel};
use super::sensor_model::{SensorModel, SensorModelConfig};

/// Headings every cell is seeded with.
const CARDINAL_HEADINGS: [f32; 4] = [0.0, 90.0, 180.0, 270.0];

/// A single pose hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Hypothesized position (cell center).
    pub position: Point2D,
    /// Hypothesized heading in degrees, [0, 360).
    pub heading: f32,
    /// Importance weight (unnormalized).
    pub weight: f64,
}

impl Particle {
    /// Create a new particle with zero weight.
    pub fn new(position: Point2D, heading: f32) -> Self {
        Self {
            position,
            heading: normalize_heading(heading),
            weight: 0.0,
        }
    }
}

/// Configuration for the particle filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Range of both real and simulated readings (world units).
    #[serde(default = "default_max_range")]
    pub max_range: f32,

    /// Agent's true starting heading in degrees.
    #[serde(default)]
    pub initial_heading: f32,

    /// Random seed for deterministic behavior (0 for random).
    #[serde(default)]
    pub seed: u64,

    /// Sensor model configuration.
    #[serde(default)]
    pub sensor: SensorModelConfig,
}

fn default_max_range() -> f32 {
    50.0
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            max_range: default_max_range(),
            initial_heading: 0.0,
            seed: 0,
            sensor: SensorModelConfig::default(),
        }
    }
}

impl LocalizationConfig {
    /// Default configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_range.is_nan() || self.max_range <= 0.0 {
            return Err(ConfigError::Invalid(
                "localization.max_range must be positive".into(),
            ));
        }
        let s = &self.sensor;
        if [s.match_likelihood, s.partial_likelihood, s.miss_likelihood]
            .iter()
            .any(|l| l.is_nan() || *l <= 0.0)
        {
            return Err(ConfigError::Invalid(
                "localization.sensor likelihoods must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// State of the particle filter for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParticleFilterState {
    /// Total number of completed steps.
    pub iterations: u64,
    /// Particles that survived the last motion update.
    pub survivors: usize,
    /// Distinct cells occupied after the last motion update.
    pub distinct_cells: usize,
    /// Best particle weight in the last sensor update.
    pub max_weight: f64,
    /// Resampling slots that fell back to a uniform draw in the last step.
    pub fallback_draws: usize,
}

/// Report for one localization step.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationStep {
    /// The agent's move.
    pub motion: AgentMotion,
    /// The agent's real range reading after moving.
    pub reading: Option<f32>,
    pub survivors: usize,
    pub distinct_cells: usize,
    pub max_weight: f64,
    /// Cell every particle agrees on, once converged.
    pub converged: Option<CellCoord>,
}

/// Monte Carlo Localization over a known grid.
pub struct Localizer<S = GridRaycaster> {
    config: LocalizationConfig,
    world: Arc<Grid>,
    sensor: S,
    motion_model: MotionModel,
    sensor_model: SensorModel,
    rng: StdRng,
    particles: Vec<Particle>,
    /// Fixed population size.
    population: usize,
    agent: CellCoord,
    heading: f32,
    state: ParticleFilterState,
    converged: Option<CellCoord>,
}

impl Localizer<GridRaycaster> {
    /// Localizer reading ranges from a simulated ray caster over `world`.
    pub fn simulated(world: Arc<Grid>, start: CellCoord, config: LocalizationConfig) -> Result<Self> {
        let sensor = GridRaycaster::new(world.clone());
        Self::new(world, sensor, start, config)
    }
}

impl<S: RangeSensor> Localizer<S> {
    /// Create a localizer with the agent's true pose at `start`.
    ///
    /// The agent's pose is only used to simulate motion and readings; the
    /// particles start spread over every walkable cell.
    pub fn new(world: Arc<Grid>, sensor: S, start: CellCoord, config: LocalizationConfig) -> Result<Self> {
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

        let rng = if config.seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(config.seed)
        };

        let particles = Self::initialize_particles(&world);
        let population = particles.len();

        log::info!(
            "Localizer created: {} particles over {} walkable cells",
            population,
            population / CARDINAL_HEADINGS.len()
        );

        Ok(Self {
            config,
            world,
            sensor,
            motion_model: MotionModel::new(),
            sensor_model: SensorModel::new(config.sensor),
            rng,
            particles,
            population,
            agent: start,
            heading: normalize_heading(config.initial_heading),
            state: ParticleFilterState::default(),
            converged: None,
        })
    }

    /// One particle per walkable cell per cardinal heading.
    fn initialize_particles(world: &Grid) -> Vec<Particle> {
        world
            .walkable_cells()
            .flat_map(|cell| {
                let position = world.world_position(cell);
                CARDINAL_HEADINGS
                    .iter()
                    .map(move |&heading| Particle::new(position, heading))
            })
            .collect()
    }

    /// Get the configuration.
    pub fn config(&self) -> &LocalizationConfig {
        &self.config
    }

    /// Get current particles (for visualization).
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Fixed population size.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Get current filter state (for diagnostics).
    pub fn state(&self) -> &ParticleFilterState {
        &self.state
    }

    /// Agent's true cell.
    pub fn agent(&self) -> CellCoord {
        self.agent
    }

    /// Agent's true heading in degrees.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn world(&self) -> &Grid {
        &self.world
    }

    pub fn is_converged(&self) -> bool {
        self.converged.is_some()
    }

    /// Fraction of the population in each occupied cell, ordered by cell.
    pub fn particle_mass(&self) -> Vec<CellMass> {
        let mut counts: BTreeMap<CellCoord, usize> = BTreeMap::new();
        for p in &self.particles {
            *counts.entry(self.world.cell_at(p.position)).or_insert(0) += 1;
        }

        let total = self.particles.len() as f64;
        counts
            .into_iter()
            .map(|(cell, n)| CellMass {
                cell,
                fraction: n as f64 / total,
            })
            .collect()
    }

    /// Most populated cell and its share of the population.
    pub fn estimate(&self) -> Option<CellMass> {
        self.particle_mass()
            .into_iter()
            .max_by(|a, b| a.fraction.total_cmp(&b.fraction))
    }

    /// Run one full MCL cycle.
    ///
    /// Once converged this is a no-op reporting the converged cell with an
    /// empty motion.
    pub fn step(&mut self, observer: &mut dyn SimulationObserver) -> Result<LocalizationStep> {
        if let Some(cell) = self.converged {
            return Ok(LocalizationStep {
                motion: AgentMotion {
                    from: self.agent,
                    to: self.agent,
                    heading: self.heading,
                    rotation: 0.0,
                },
                reading: None,
                survivors: self.particles.len(),
                distinct_cells: 1,
                max_weight: self.state.max_weight,
                converged: Some(cell),
            });
        }

        // Motion sampling
        let motion = self
            .motion_model
            .sample(&self.world, self.agent, self.heading, &mut self.rng)?;

        // Motion update
        let mut survivors: Vec<Particle> = self
            .particles
            .iter()
            .filter_map(|p| self.motion_model.apply(&self.world, p, &motion))
            .collect();
        if survivors.is_empty() {
            log::warn!("Every particle was discarded by the motion update");
            return Err(LocalizationError::ParticlesDepleted.into());
        }

        // The agent only moves once the step can complete
        self.agent = motion.to;
        self.heading = motion.heading;

        // Prior over distinct positions
        let distinct_cells = survivors
            .iter()
            .map(|p| self.world.cell_at(p.position))
            .collect::<HashSet<_>>()
            .len();
        let prior = 1.0 / distinct_cells as f64;

        // Sensor update
        let reading = self.sensor.first_hit(
            self.world.world_position(self.agent),
            direction_from_heading(self.heading),
            self.config.max_range,
        );
        let mut max_weight = 0.0_f64;
        for p in &mut survivors {
            let simulated = self.sensor.first_hit(
                p.position,
                direction_from_heading(p.heading),
                self.config.max_range,
            );
            p.weight = prior * self.sensor_model.likelihood(reading, simulated);
            max_weight = max_weight.max(p.weight);
        }

        // Resample
        let survivor_count = survivors.len();
        let (particles, fallback_draws) =
            resample(&mut self.rng, survivors, self.population, max_weight);
        self.particles = particles;

        self.state = ParticleFilterState {
            iterations: self.state.iterations + 1,
            survivors: survivor_count,
            distinct_cells,
            max_weight,
            fallback_draws,
        };

        log::debug!(
            "Step {}: agent {} heading {:.0}, reading {:?}, {} survivors in {} cells",
            self.state.iterations,
            self.agent,
            self.heading,
            reading,
            survivor_count,
            distinct_cells
        );

        // Convergence
        let mass = self.particle_mass();
        observer.on_particles(&mass);
        self.check_convergence(&mass, observer);

        Ok(LocalizationStep {
            motion,
            reading,
            survivors: survivor_count,
            distinct_cells,
            max_weight,
            converged: self.converged,
        })
    }

    /// Mark the run converged when all mass sits in one cell.
    fn check_convergence(&mut self, mass: &[CellMass], observer: &mut dyn SimulationObserver) {
        if self.converged.is_some() {
            return;
        }
        if let [only] = mass {
            self.converged = Some(only.cell);
            log::info!(
                "Localized at {} after {} steps (agent at {})",
                only.cell,
                self.state.iterations,
                self.agent
            );
            observer.on_finished(Completion::Localized { cell: only.cell });
        }
    }
}

/// Rejection-style weighted resampling with replacement.
///
/// For each of `count` slots a threshold is drawn uniformly from
/// `[0, max_weight)` and a particle is chosen uniformly among those whose
/// weight exceeds it. A slot with no qualifying particle draws uniformly from
/// the whole population. Returns the new population and the number of
/// fallback draws.
///
/// `candidates` must be non-empty.
fn resample<R: Rng + ?Sized>(
    rng: &mut R,
    mut candidates: Vec<Particle>,
    count: usize,
    max_weight: f64,
) -> (Vec<Particle>, usize) {
    // Heaviest first: the particles above any threshold form a prefix
    candidates.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let mut next = Vec::with_capacity(count);
    let mut fallback_draws = 0;

    for _ in 0..count {
        let eligible = if max_weight > 0.0 {
            let threshold = rng.random_range(0.0..max_weight);
            candidates.partition_point(|p| p.weight > threshold)
        } else {
            0
        };

        let pick = if eligible == 0 {
            fallback_draws += 1;
            rng.random_range(0..candidates.len())
        } else {
            rng.random_range(0..eligible)
        };
        next.push(candidates[pick]);
    }

    if fallback_draws > 0 {
        log::debug!("Resampling fell back to uniform draws for {} slots", fallback_draws);
    }

    (next, fallback_draws)
}
