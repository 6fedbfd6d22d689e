//! YAML scenario loading.
//!
//! A scenario describes the ground-truth world and where the agent starts,
//! plus any [`SimulationConfig`] sections to override.
//!
//! # Format
//!
//! ```yaml
//! name: l-corridor
//! world:
//!   # '#' wall, '.' free, 'R' agent start. Top row is the highest y.
//!   layout: |
//!     ######
//!     #.####
//!     #R...#
//!     ######
//!   walls: [[2, 2]]          # optional extra walls
//! start: [1, 1]              # optional if the layout has an 'R'
//! localization:
//!   seed: 42
//! ```
//!
//! Without a layout, `width` and `height` are required and every cell not
//! listed in `walls` is free.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::core::CellCoord;
use crate::error::ConfigError;
use crate::grid::Grid;

/// Ground-truth world description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub height: Option<usize>,
    /// Wall cells, added on top of the layout.
    #[serde(default)]
    pub walls: Vec<CellCoord>,
    /// ASCII map.
    #[serde(default)]
    pub layout: Option<String>,
}

/// Parsed layout: dimensions, walls, and start marker.
struct Layout {
    width: usize,
    height: usize,
    walls: Vec<CellCoord>,
    start: Option<CellCoord>,
}

impl Layout {
    fn parse(text: &str) -> Result<Self, ConfigError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ConfigError::Invalid("world.layout is empty".into()));
        }

        let mut walls = Vec::new();
        let mut start = None;

        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(ConfigError::Invalid(format!(
                    "world.layout row {} has {} cells, expected {}",
                    row_idx + 1,
                    row.chars().count(),
                    width
                )));
            }
            let y = height - 1 - row_idx;
            for (x, ch) in row.chars().enumerate() {
                let coord = CellCoord::new(x, y);
                match ch {
                    '#' => walls.push(coord),
                    '.' => {}
                    'R' => {
                        if start.replace(coord).is_some() {
                            return Err(ConfigError::Invalid(
                                "world.layout has more than one 'R'".into(),
                            ));
                        }
                    }
                    other => {
                        return Err(ConfigError::Invalid(format!(
                            "world.layout has unknown cell '{}' at {}",
                            other, coord
                        )));
                    }
                }
            }
        }

        Ok(Self {
            width,
            height,
            walls,
            start,
        })
    }
}

/// A runnable scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub world: WorldConfig,
    #[serde(default)]
    pub start: Option<CellCoord>,
    #[serde(flatten)]
    pub config: SimulationConfig,
}

impl Scenario {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let scenario: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        scenario.config.validate()?;
        Ok(scenario)
    }

    /// Build the ground-truth grid and resolve the start cell.
    pub fn build_world(&self) -> Result<(Grid, CellCoord), ConfigError> {
        let layout = self.world.layout.as_deref().map(Layout::parse).transpose()?;

        let (width, height, mut walls, layout_start) = match layout {
            Some(l) => {
                for (given, actual, axis) in [
                    (self.world.width, l.width, "width"),
                    (self.world.height, l.height, "height"),
                ] {
                    if let Some(given) = given
                        && given != actual
                    {
                        return Err(ConfigError::Invalid(format!(
                            "world.{} is {} but the layout is {}",
                            axis, given, actual
                        )));
                    }
                }
                (l.width, l.height, l.walls, l.start)
            }
            None => {
                let width = self.world.width.ok_or_else(|| {
                    ConfigError::Invalid("world.width is required without a layout".into())
                })?;
                let height = self.world.height.ok_or_else(|| {
                    ConfigError::Invalid("world.height is required without a layout".into())
                })?;
                (width, height, Vec::new(), None)
            }
        };
        walls.extend(self.world.walls.iter().copied());

        let grid = Grid::ground_truth(width, height, &walls, self.config.grid)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let start = self
            .start
            .or(layout_start)
            .ok_or_else(|| ConfigError::Invalid("scenario has no start cell".into()))?;
        if !grid.is_walkable(start) {
            return Err(ConfigError::Invalid(format!(
                "start cell {} is outside the world or a wall",
                start
            )));
        }

        Ok((grid, start))
    }
}
