//! Range sensing.
//!
//! The planners treat sensing as an opaque service behind [`RangeSensor`].
//! [`GridRaycaster`] is the simulated implementation: it casts rays through
//! a ground-truth [`Grid`](crate::grid::Grid).

mod raycast;

pub use raycast::{GridRaycaster, GridTraversal};

use crate::core::{CellCoord, Point2D};

/// One cell crossed by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to where the ray enters the cell.
    pub distance: f32,
    /// World position of the crossed cell.
    pub position: Point2D,
    /// Grid coordinate of the crossed cell.
    pub cell: CellCoord,
}

/// Ray-cast service used by exploration and localization.
pub trait RangeSensor {
    /// Every cell the ray passes through up to `max_range`, nearest first.
    ///
    /// The cell containing `origin` is not reported.
    fn hits(&self, origin: Point2D, direction: Point2D, max_range: f32) -> Vec<RayHit>;

    /// Distance to the first obstruction along the ray, or `None` if the
    /// ray travels `max_range` (or leaves the world) without hitting one.
    fn first_hit(&self, origin: Point2D, direction: Point2D, max_range: f32) -> Option<f32>;
}
