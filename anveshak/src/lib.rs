//! Anveshak - Grid exploration and particle-filter localization
//!
//! Two simulation engines share one grid world:
//!
//! - **Explorer**: scans with a ray sensor, detects frontiers between known
//!   and unknown space, and drives to them with A* until nothing is left
//! - **Localizer**: Monte Carlo Localization over a known map, using one
//!   range reading per step and a random walk through walkable cells
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      main                           │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               runner/, config, io/                  │  ← Infrastructure
//! │       (tick loop, YAML config, scenarios)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │          exploration/, algorithms/                  │  ← Engines
//! │    (frontiers, explorer, A*, particle filter)       │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │             sensors/, collections/                  │  ← Primitives
//! │            (raycasting, min-heap)                   │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                core/, grid/                         │  ← Foundation
//! │          (types, math, cell grid)                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use anveshak::{CellCoord, ExplorationConfig, Explorer, Grid, GridConfig, RecordingObserver};
//!
//! let world = Arc::new(Grid::ground_truth(8, 8, &[], GridConfig::default())?);
//! let mut explorer = Explorer::simulated(world, CellCoord::new(0, 0), ExplorationConfig::default())?;
//! let mut observer = RecordingObserver::new();
//! while !explorer.is_done() {
//!     explorer.step(&mut observer)?;
//! }
//! # Ok::<(), anveshak::Error>(())
//! ```

// ============================================================================
// Layer 1: Foundation
// ============================================================================
pub mod core;
pub mod error;
pub mod grid;

// ============================================================================
// Layer 2: Primitives (depends on core, grid)
// ============================================================================
pub mod collections;
pub mod sensors;

// ============================================================================
// Layer 3: Engines (depends on all of the above)
// ============================================================================
pub mod algorithms;
pub mod events;
pub mod exploration;

// ============================================================================
// Layer 4: Infrastructure
// ============================================================================
pub mod config;
pub mod io;
pub mod runner;

// ============================================================================
// Convenience re-exports
// ============================================================================

pub use error::{ConfigError, Error, Result};

// Core types
pub use core::math;
pub use core::{CellCoord, Point2D};

// Grid
pub use grid::{Cell, CellClass, Grid, GridConfig, GridError};

// Primitives
pub use collections::MinHeap;
pub use sensors::{GridRaycaster, RangeSensor, RayHit};

// Algorithms
pub use algorithms::localization::{
    LocalizationConfig, LocalizationError, LocalizationStep, Localizer, Particle,
    SensorModelConfig,
};
pub use algorithms::planning::{AStarPlanner, GridPath, PlanningError};

// Exploration
pub use exploration::{
    ExplorationConfig, ExplorationState, ExplorationStep, Explorer, FrontierSelector, PlanOutcome,
};

// Events and running
pub use config::SimulationConfig;
pub use events::{CellMass, Completion, NullObserver, RecordingObserver, SimulationObserver};
pub use io::Scenario;
pub use runner::{CancellationToken, RunOutcome, RunSummary, Runner, RunnerConfig};
