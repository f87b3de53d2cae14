//! Axis-aligned rectangles of the parameter plane.

use serde::{Deserialize, Serialize};

use super::Point;
use crate::error::{DistanceError, Result};

/// Rectangle `[lower.x, upper.x] × [lower.y, upper.y]` a module is defined over.
///
/// `lower <= upper` holds componentwise for every value of this type,
/// including deserialized ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct Bounds {
    lower: Point,
    upper: Point,
}

#[derive(Deserialize)]
struct RawBounds {
    lower: Point,
    upper: Point,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = DistanceError;

    fn try_from(raw: RawBounds) -> Result<Self> {
        Bounds::new(raw.lower, raw.upper)
    }
}

impl Bounds {
    pub fn new(lower: Point, upper: Point) -> Result<Self> {
        let axes = [(lower.x, upper.x), (lower.y, upper.y)];
        for (axis, (lo, hi)) in axes.into_iter().enumerate() {
            // Also rejects NaN corners
            if !(lo <= hi) {
                return Err(DistanceError::InvalidBounds {
                    axis,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> Point {
        self.lower
    }

    pub fn upper(&self) -> Point {
        self.upper
    }

    /// Corner `(lower.x, upper.y)`
    pub fn upper_left(&self) -> Point {
        Point::new(self.lower.x, self.upper.y)
    }

    /// Corner `(upper.x, lower.y)`
    pub fn lower_right(&self) -> Point {
        Point::new(self.upper.x, self.lower.y)
    }

    /// `(Δx, Δy)`
    pub fn extent(&self) -> (f64, f64) {
        (self.upper.x - self.lower.x, self.upper.y - self.lower.y)
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            lower: Point::new(
                self.lower.x.min(other.lower.x),
                self.lower.y.min(other.lower.y),
            ),
            upper: Point::new(
                self.upper.x.max(other.upper.x),
                self.upper.y.max(other.upper.y),
            ),
        }
    }

    /// Fails on a zero extent along either axis.
    pub fn require_area(&self) -> Result<(f64, f64)> {
        let (dx, dy) = self.extent();
        if dx == 0.0 {
            return Err(DistanceError::DegenerateRectangle { axis: 0 });
        }
        if dy == 0.0 {
            return Err(DistanceError::DegenerateRectangle { axis: 1 });
        }
        Ok((dx, dy))
    }
}
