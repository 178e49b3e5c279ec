//! Bounding box of live cells.

use serde::{Deserialize, Serialize};

/// Live-cell extent in cell coordinates. `right` and `bottom` are exclusive.
///
/// An empty universe reports infinite (non-finite) bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    /// Bounds of a universe with no live cells.
    pub const EMPTY: Bounds = Bounds {
        left: f64::INFINITY,
        right: f64::NEG_INFINITY,
        top: f64::INFINITY,
        bottom: f64::NEG_INFINITY,
    };

    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Bounds covering exactly one cell.
    #[allow(clippy::cast_precision_loss)]
    pub fn cell(x: i64, y: i64) -> Self {
        Self::new(x as f64, x as f64 + 1.0, y as f64, y as f64 + 1.0)
    }

    /// True when all four edges are finite.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.top.is_finite()
            && self.bottom.is_finite()
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Geometric center in cell coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_not_finite() {
        assert!(!Bounds::EMPTY.is_finite());
        assert!(Bounds::new(0.0, 1.0, 0.0, 1.0).is_finite());
    }

    #[test]
    fn union_with_empty_is_identity() {
        let b = Bounds::cell(3, -2);
        assert_eq!(Bounds::EMPTY.union(&b), b);
        assert_eq!(b.union(&Bounds::EMPTY), b);
    }

    #[test]
    fn center_and_size() {
        let b = Bounds::new(-10.0, 10.0, -4.0, 2.0);
        assert_eq!(b.center(), (0.0, -1.0));
        assert_eq!(b.width(), 20.0);
        assert_eq!(b.height(), 6.0);
    }
}
