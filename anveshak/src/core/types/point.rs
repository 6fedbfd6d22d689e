//! Continuous world-space point.

use serde::{Deserialize, Serialize};

/// A 2D point in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Point offset by `direction * distance`.
    #[inline]
    pub fn advance(&self, direction: Point2D, distance: f32) -> Point2D {
        Point2D::new(self.x + direction.x * distance, self.y + direction.y * distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.distance_squared(&b), 25.0);
    }

    #[test]
    fn test_advance() {
        let p = Point2D::new(1.0, 1.0).advance(Point2D::new(0.0, -1.0), 2.5);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, -1.5);
    }
}
