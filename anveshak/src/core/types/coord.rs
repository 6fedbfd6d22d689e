//! Integer grid coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column/row address of a grid cell.
///
/// Serialized as a `[x, y]` pair so scenarios can list cells compactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct CellCoord {
    pub x: usize,
    pub y: usize,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Coordinate shifted by a signed step, or `None` if it would go negative.
    ///
    /// Upper bounds are the grid's concern; see `Grid::offset`.
    #[inline]
    pub fn checked_offset(&self, dx: i32, dy: i32) -> Option<CellCoord> {
        let x = self.x.checked_add_signed(dx as isize)?;
        let y = self.y.checked_add_signed(dy as isize)?;
        Some(CellCoord::new(x, y))
    }

    /// Manhattan distance in cells.
    #[inline]
    pub fn manhattan(&self, other: &CellCoord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<[usize; 2]> for CellCoord {
    fn from([x, y]: [usize; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<CellCoord> for [usize; 2] {
    fn from(c: CellCoord) -> Self {
        [c.x, c.y]
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_offset() {
        let c = CellCoord::new(0, 2);
        assert_eq!(c.checked_offset(1, -1), Some(CellCoord::new(1, 1)));
        assert_eq!(c.checked_offset(-1, 0), None);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(CellCoord::new(0, 0).manhattan(&CellCoord::new(3, 4)), 7);
    }

    #[test]
    fn test_yaml_pair_form() {
        let c: CellCoord = serde_yaml::from_str("[3, 5]").unwrap();
        assert_eq!(c, CellCoord::new(3, 5));
    }
}
