//! Localization module.
//!
//! Monte Carlo Localization of an agent moving cell by cell through a known
//! grid, observing a single range reading along its heading.
//!
//! # Components
//!
//! - [`MotionModel`]: samples the agent's next cell and replays it on particles
//! - [`SensorModel`]: three-tier likelihood of a simulated vs. real reading
//! - [`Localizer`]: the full MCL loop with rejection resampling
//!
//! # Example
//!
//! ```ignore
//! use anveshak::algorithms::localization::{Localizer, LocalizationConfig};
//! use anveshak::events::NullObserver;
//!
//! let mut localizer = Localizer::simulated(world, start, LocalizationConfig::default())?;
//! while !localizer.is_converged() {
//!     localizer.step(&mut NullObserver)?;
//! }
//! let cell = localizer.estimate();
//! ```

mod motion_model;
mod particle_filter;
mod sensor_model;

pub use motion_model::{AgentMotion, MotionModel};
pub use particle_filter::{
    LocalizationConfig, LocalizationStep, Localizer, Particle, ParticleFilterState,
};
pub use sensor_model::{SensorModel, SensorModelConfig};

use thiserror::Error;

use crate::core::CellCoord;

/// Localization failures. Each one ends the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocalizationError {
    /// The agent has no walkable 4-neighbor to move to.
    #[error("Agent at {cell} has no legal move")]
    NoLegalMove { cell: CellCoord },

    /// Every particle left the map or hit a wall during the motion update.
    #[error("All particles were discarded by the motion update")]
    ParticlesDepleted,
}
