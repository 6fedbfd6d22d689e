//! Core value types.
//!
//! - [`Point2D`]: continuous world position
//! - [`CellCoord`]: integer grid coordinate

mod coord;
mod point;

pub use coord::CellCoord;
pub use point::Point2D;
