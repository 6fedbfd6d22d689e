//! Observer hooks for rendering and completion.
//!
//! The engines report what changed through [`SimulationObserver`] and never
//! depend on how it is displayed. Every hook has an empty default, so an
//! observer only implements what it consumes.

use crate::core::CellCoord;
use crate::grid::CellClass;

/// Fraction of the particle population occupying one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMass {
    pub cell: CellCoord,
    /// In (0, 1]; the fractions of one update sum to 1.
    pub fraction: f64,
}

/// Why a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// No frontiers remain; everything reachable has been mapped.
    MappingComplete,
    /// Every particle occupies the same cell.
    Localized { cell: CellCoord },
}

/// Receives engine events. Called synchronously from `step`.
pub trait SimulationObserver {
    /// A cell's display class changed.
    fn on_cell_changed(&mut self, _coord: CellCoord, _class: CellClass) {}

    /// Particle mass per occupied cell after a localization step.
    fn on_particles(&mut self, _mass: &[CellMass]) {}

    /// The run reached its terminal condition. Called once per run.
    fn on_finished(&mut self, _completion: Completion) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SimulationObserver for NullObserver {}

/// Observer that records every event, for tests and run summaries.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub cell_changes: Vec<(CellCoord, CellClass)>,
    pub particle_updates: usize,
    pub last_mass: Vec<CellMass>,
    pub completions: Vec<Completion>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent class reported for a cell.
    pub fn last_class(&self, coord: CellCoord) -> Option<CellClass> {
        self.cell_changes
            .iter()
            .rev()
            .find(|(c, _)| *c == coord)
            .map(|(_, class)| *class)
    }
}

impl SimulationObserver for RecordingObserver {
    fn on_cell_changed(&mut self, coord: CellCoord, class: CellClass) {
        self.cell_changes.push((coord, class));
    }

    fn on_particles(&mut self, mass: &[CellMass]) {
        self.particle_updates += 1;
        self.last_mass = mass.to_vec();
    }

    fn on_finished(&mut self, completion: Completion) {
        self.completions.push(completion);
    }
}
