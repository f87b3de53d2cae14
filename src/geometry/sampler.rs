//! Grid-of-lines sampling over a bounding rectangle
//!
//! The matching distance is a supremum over all lines of positive slope.
//! We replace it by a maximum over a deterministic grid: `grid_size` slopes
//! strictly inside (0°, 90°), and for each slope `grid_size` parallel lines
//! sweeping the rectangle from its lower-right to its upper-left corner.

use super::{find_offset, Line, Point};
use crate::error::{DistanceError, Result};

/// Slopes `90·(i+1)/(n+1)`, never 0 or 90
pub fn sample_slopes(grid_size: usize) -> Vec<f64> {
    (0..grid_size)
        .map(|i| 90.0 * (i + 1) as f64 / (grid_size + 1) as f64)
        .collect()
}

/// Offsets for one slope between the corner offsets.
///
/// A single offset is `ul - lr`; this does not match the midpoint of the
/// general sweep but is kept for compatibility with existing results.
fn sample_offsets(grid_size: usize, ul_offset: f64, lr_offset: f64) -> Vec<f64> {
    if grid_size < 2 {
        return vec![ul_offset - lr_offset];
    }
    let step = (ul_offset - lr_offset) / (grid_size - 1) as f64;
    (0..grid_size)
        .map(|j| lr_offset + j as f64 * step)
        .collect()
}

/// Lines sampled over the rectangle with corners `upper_left`, `lower_right`.
///
/// Produces `grid_size²` lines (one line when `grid_size == 1`), ordered by
/// slope and then by offset. Output is fully deterministic.
pub fn generate_lines(grid_size: usize, upper_left: Point, lower_right: Point) -> Result<Vec<Line>> {
    if grid_size == 0 {
        return Err(DistanceError::InvalidGridSize { min: 1, got: 0 });
    }

    let mut lines = Vec::with_capacity(grid_size * grid_size);
    for slope in sample_slopes(grid_size) {
        let ul_offset = find_offset(slope, upper_left);
        let lr_offset = find_offset(slope, lower_right);
        lines.extend(
            sample_offsets(grid_size, ul_offset, lr_offset)
                .into_iter()
                .map(|offset| Line::new(slope, offset)),
        );
    }
    Ok(lines)
}
