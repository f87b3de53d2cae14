//! Lines in the parameter plane
//!
//! A line of positive slope is described the way the persistence engine
//! describes slices: by its angle in degrees and a signed offset. The
//! offset is the distance from the origin to the foot of the perpendicular
//! dropped onto the line, positive when the line passes above the origin.
//!
//! ## Line Parameterization
//!
//! Points on a line are addressed by arc length. Parameter 0 sits where the
//! line crosses the positive y-axis (offset > 0) or the x-axis (offset <= 0).
//! Vertical lines use `y` as parameter, horizontal lines use `x`.

use serde::{Deserialize, Serialize};

/// A point of the parameter plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Componentwise order `self <= other`
    pub fn le(&self, other: &Point) -> bool {
        self.x <= other.x && self.y <= other.y
    }

    /// Do the points share an x or y coordinate?
    pub fn shares_axis(&self, other: &Point) -> bool {
        self.x == other.x || self.y == other.y
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A line given by slope (degrees) and signed offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub slope: f64,
    pub offset: f64,
}

impl Line {
    pub fn new(slope: f64, offset: f64) -> Self {
        Self { slope, offset }
    }

    /// Slope as a ratio dy/dx
    pub fn gradient(&self) -> f64 {
        self.slope.to_radians().tan()
    }

    pub fn is_vertical(&self) -> bool {
        self.slope == 90.0
    }

    pub fn is_horizontal(&self) -> bool {
        self.slope == 0.0
    }
}

/// Offset of the line with the given slope (degrees) through `point`.
///
/// The point is assumed to lie on the described line; nothing checks it.
/// Axis-parallel slopes are answered directly: 0° gives `y`, 90° gives `-x`.
pub fn find_offset(slope: f64, point: Point) -> f64 {
    if slope == 0.0 {
        return point.y;
    }
    if slope == 90.0 {
        return -point.x;
    }

    let m = slope.to_radians().tan();
    let b = point.y - point.x * m;

    // Foot of the perpendicular from the origin onto y = m x + b
    let x_min = -m * b / (1.0 + m * m);
    let y_min = m * x_min + b;
    let unsigned = (x_min * x_min + y_min * y_min).sqrt();

    if b > 0.0 {
        unsigned
    } else {
        -unsigned
    }
}

/// Slope and offset of the line through `a <= b`.
///
/// Coincident x coordinates (including `a == b`) give the vertical line.
pub fn slope_offset(a: Point, b: Point) -> Line {
    let slope = if a.x == b.x {
        90.0
    } else {
        (b.y - a.y).atan2(b.x - a.x).to_degrees()
    };
    Line::new(slope, find_offset(slope, a))
}

/// Arc-length parameter of `point` along `line`.
///
/// Like [`find_offset`], assumes the point lies on the line.
pub fn line_parameter(line: &Line, point: Point) -> f64 {
    if line.is_vertical() {
        return point.y;
    }
    if line.is_horizontal() {
        return point.x;
    }

    let m = line.gradient();
    if line.offset > 0.0 {
        let y_int = point.y - m * point.x;
        let dist = ((point.y - y_int).powi(2) + point.x.powi(2)).sqrt();
        if point.x > 0.0 {
            dist
        } else {
            -dist
        }
    } else {
        let x_int = point.x - point.y / m;
        let dist = (point.y.powi(2) + (point.x - x_int).powi(2)).sqrt();
        if point.y > 0.0 {
            dist
        } else {
            -dist
        }
    }
}
