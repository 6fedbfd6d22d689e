//! Simulation configuration.
//!
//! All sections are optional in YAML; missing fields take their defaults.
//!
//! ```yaml
//! grid:
//!   cell_size: 1.0
//! exploration:
//!   scan_headings: 360
//!   max_range: 5.0
//! localization:
//!   seed: 42
//!   sensor:
//!     range_tolerance: 0.001
//! runner:
//!   max_steps: 10000
//!   step_delay_ms: 0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::localization::LocalizationConfig;
use crate::error::ConfigError;
use crate::exploration::ExplorationConfig;
use crate::grid::GridConfig;
use crate::runner::RunnerConfig;

/// Combined configuration for both engines and the runner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub grid: GridConfig,
    pub exploration: ExplorationConfig,
    pub localization: LocalizationConfig,
    pub runner: RunnerConfig,
}

impl SimulationConfig {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.cell_size.is_nan() || self.grid.cell_size <= 0.0 {
            return Err(ConfigError::Invalid("grid.cell_size must be positive".into()));
        }
        self.exploration.validate()?;
        self.localization.validate()
    }
}
