//! Foundation types and math primitives.
//!
//! This module has no dependencies on other anveshak modules.
//!
//! - [`types`]: World points and grid coordinates
//! - [`math`]: Heading arithmetic in degrees

pub mod math;
pub mod types;

pub use math::{direction_from_heading, grid_step, heading_towards, normalize_heading};
pub use types::{CellCoord, Point2D};
