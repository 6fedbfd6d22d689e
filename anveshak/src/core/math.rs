//! Heading arithmetic.
//!
//! Headings are in degrees, wrapped to [0, 360). Heading 0 faces +Y and
//! headings grow counter-clockwise, so 90° faces -X and 270° faces +X:
//!
//! ```text
//!              0°
//!              ▲ +Y
//!              │
//!     90° ◄────┼────► 270°
//!              │
//!              ▼
//!             180°
//! ```

/// Wrap a heading in degrees to [0, 360).
///
/// # Example
/// ```
/// use anveshak::core::math::normalize_heading;
///
/// assert_eq!(normalize_heading(-90.0), 270.0);
/// assert_eq!(normalize_heading(450.0), 90.0);
/// ```
#[inline]
pub fn normalize_heading(degrees: f32) -> f32 {
    let h = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    // Adding 0.0 turns -0.0 into 0.0.
    if h >= 360.0 { 0.0 } else { h + 0.0 }
}

/// Unit forward vector for a heading.
#[inline]
pub fn direction_from_heading(degrees: f32) -> crate::core::Point2D {
    let (sin, cos) = degrees.to_radians().sin_cos();
    crate::core::Point2D::new(-sin, cos)
}

/// Heading that faces along the displacement `(dx, dy)`.
///
/// Inverse of [`direction_from_heading`] for non-zero displacements.
#[inline]
pub fn heading_towards(dx: f32, dy: f32) -> f32 {
    normalize_heading(-dx.atan2(dy).to_degrees())
}

/// Round a heading's forward vector to a unit grid step.
///
/// Cardinal headings give exact steps; anything else snaps to the
/// nearest of the eight neighbors.
#[inline]
pub fn grid_step(degrees: f32) -> (i32, i32) {
    let dir = direction_from_heading(degrees);
    (dir.x.round() as i32, dir.y.round() as i32)
}

/// `count` headings evenly spaced over a full turn, starting at 0°.
pub fn sweep_headings(count: usize) -> impl Iterator<Item = f32> {
    let step = if count == 0 { 0.0 } else { 360.0 / count as f32 };
    (0..count).map(move |i| i as f32 * step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_heading() {
        assert_relative_eq!(normalize_heading(0.0), 0.0);
        assert_relative_eq!(normalize_heading(360.0), 0.0);
        assert_relative_eq!(normalize_heading(-180.0), 180.0);
        assert_relative_eq!(normalize_heading(725.0), 5.0);
        assert!(normalize_heading(-1e-9) < 360.0);
    }

    #[test]
    fn test_normalize_heading_clears_negative_zero() {
        assert!(normalize_heading(-0.0).is_sign_positive());
        assert!(normalize_heading(-360.0).is_sign_positive());
        // -atan2(0, 1) is -0.0
        assert!(heading_towards(0.0, 1.0).is_sign_positive());
        assert_eq!(format!("{}", normalize_heading(-0.0)), "0");
    }

    #[test]
    fn test_direction_convention() {
        let up = direction_from_heading(0.0);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);

        let right = direction_from_heading(270.0);
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_heading_towards_inverts_direction() {
        assert_relative_eq!(heading_towards(0.0, 1.0), 0.0);
        assert_relative_eq!(heading_towards(-1.0, 0.0), 90.0);
        assert_relative_eq!(heading_towards(0.0, -1.0), 180.0);
        assert_relative_eq!(heading_towards(1.0, 0.0), 270.0);
    }

    #[test]
    fn test_grid_step_cardinals() {
        assert_eq!(grid_step(0.0), (0, 1));
        assert_eq!(grid_step(90.0), (-1, 0));
        assert_eq!(grid_step(180.0), (0, -1));
        assert_eq!(grid_step(270.0), (1, 0));
    }

    #[test]
    fn test_sweep_headings() {
        let headings: Vec<f32> = sweep_headings(4).collect();
        assert_eq!(headings, vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(sweep_headings(0).count(), 0);
    }
}
