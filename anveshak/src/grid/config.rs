//! Grid geometry configuration.

use serde::{Deserialize, Serialize};

use crate::core::Point2D;

/// Geometry of a grid in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cell edge length in world units (cell diameter).
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,

    /// World position of the grid's bottom-left corner.
    ///
    /// `None` centers the grid on the world origin.
    #[serde(default)]
    pub origin: Option<Point2D>,
}

fn default_cell_size() -> f32 {
    1.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: default_cell_size(),
            origin: None,
        }
    }
}

impl GridConfig {
    /// Bottom-left corner for a grid of the given size.
    pub fn resolve_origin(&self, width: usize, height: usize) -> Point2D {
        self.origin.unwrap_or_else(|| {
            Point2D::new(
                -(width as f32) * self.cell_size / 2.0,
                -(height as f32) * self.cell_size / 2.0,
            )
        })
    }
}
