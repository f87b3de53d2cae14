//! Matching Distance between 2-parameter Modules
//!
//! The matching distance is the supremum over lines L of positive slope of
//! the weighted bottleneck distance between the slices M|L and N|L. Here it
//! is approximated by a maximum over the line grid of `generate_lines`;
//! the approximation improves as `grid_size` grows and never exceeds the
//! true value.
//!
//! ## Weights
//!
//! For a line of slope m the weight is w = 1/sqrt(1 + q²), q = max(m, 1/m),
//! chosen so that modules at interleaving distance 1 have weighted slice
//! distances at most 1.
//!
//! With normalization the rectangle is rescaled to the unit square: the
//! slope becomes m·Δx/Δy and arc lengths along the line, hence bottleneck
//! distances, stretch by sqrt(((m/Δy)² + (1/Δx)²)/(m² + 1)).

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::MatchingParams;
use crate::error::{DistanceError, OracleError, Result};
use crate::geometry::{generate_lines, Bounds, Line};
use crate::oracle::{expect_len, BottleneckOracle, ModuleOracle};
use crate::topology::Barcode;

/// Rectangle to work over: `fixed` if given, else the bounds of `module1`
/// united with those of `module2`.
pub fn resolve_bounds<O: ModuleOracle>(
    oracle: &O,
    module1: &O::Module,
    module2: Option<&O::Module>,
    fixed: Option<Bounds>,
) -> Result<Bounds> {
    if let Some(bounds) = fixed {
        return Ok(bounds);
    }
    let mut bounds = oracle.bounds(module1)?;
    if let Some(m2) = module2 {
        bounds = bounds.union(&oracle.bounds(m2)?);
    }
    debug!("resolved bounds {:?} -> {:?}", bounds.lower(), bounds.upper());
    Ok(bounds)
}

/// `(Δx, Δy)` of a rectangle that can be rescaled to the unit square
pub(crate) fn normalization_extent(bounds: &Bounds) -> Result<(f64, f64)> {
    let (dx, dy) = bounds.extent();
    if dx == 0.0 || dy == 0.0 {
        return Err(DistanceError::UndefinedNormalization { dx, dy });
    }
    Ok((dx, dy))
}

/// Weight of a line with gradient `m`; `extent` rescales the slope to the
/// unit square first.
pub fn slope_weight(m: f64, extent: Option<(f64, f64)>) -> f64 {
    let m = match extent {
        Some((dx, dy)) => m * dx / dy,
        None => m,
    };
    let q = m.max(1.0 / m);
    1.0 / (1.0 + q * q).sqrt()
}

/// Factor by which normalization stretches distances along a line
fn bottleneck_stretch(m: f64, (dx, dy): (f64, f64)) -> f64 {
    (((m / dy).powi(2) + (1.0 / dx).powi(2)) / (m * m + 1.0)).sqrt()
}

/// Weighted maximum of raw per-line distances.
///
/// `raw_distances[i]` belongs to `lines[i]`. An empty line list gives 0.
pub fn calculate_match(lines: &[Line], raw_distances: &[f64], normalize: bool, bounds: &Bounds) -> Result<f64> {
    if lines.len() != raw_distances.len() {
        return Err(OracleError::LengthMismatch {
            expected: lines.len(),
            actual: raw_distances.len(),
        }
        .into());
    }
    let extent = if normalize {
        Some(normalization_extent(bounds)?)
    } else {
        None
    };

    let dist = lines
        .par_iter()
        .zip(raw_distances.par_iter())
        .map(|(line, &raw)| {
            let m = line.gradient();
            let weighted = match extent {
                Some(ext) => slope_weight(m, Some(ext)) * raw * bottleneck_stretch(m, ext),
                None => slope_weight(m, None) * raw,
            };
            trace!(slope = line.slope, offset = line.offset, raw, weighted, "line distance");
            weighted
        })
        .reduce(|| 0.0, f64::max);
    Ok(dist)
}

/// Line grid over `bounds`; fails on a zero extent along either axis,
/// reported as `UndefinedNormalization` when normalizing.
pub(crate) fn matching_lines(bounds: &Bounds, params: &MatchingParams) -> Result<Vec<Line>> {
    if params.normalize {
        normalization_extent(bounds)?;
    }
    bounds.require_area()?;
    generate_lines(params.grid_size, bounds.upper_left(), bounds.lower_right())
}

/// Barcodes of `module` along every line, in line order
pub(crate) fn slice_barcodes<O: ModuleOracle>(oracle: &O, module: &O::Module, lines: &[Line]) -> Result<Vec<Barcode>> {
    Ok(expect_len(oracle.barcodes(module, lines)?, lines.len())?)
}

/// Weighted maximum over the bottleneck distances of two barcode batches
pub(crate) fn match_barcodes<B: BottleneckOracle>(
    bottleneck: &B,
    lines: &[Line],
    bars1: &[Barcode],
    bars2: &[Barcode],
    normalize: bool,
    bounds: &Bounds,
) -> Result<f64> {
    let raw = bottleneck.multi_distance(bars1, bars2)?;
    calculate_match(lines, &raw, normalize, bounds)
}

/// Approximate matching distance between two modules.
///
/// Each module's barcodes along the whole line grid are fetched in a single
/// oracle call, and the bottleneck oracle is asked once for the batch.
///
/// The result is a lower approximation from finitely many lines; boundary
/// effects of the sampled rectangle and the slope grid both shrink with
/// `grid_size`. A rectangle with zero extent along an axis is rejected.
pub fn matching_distance<O, B>(
    oracle: &O,
    bottleneck: &B,
    module1: &O::Module,
    module2: &O::Module,
    params: &MatchingParams,
) -> Result<f64>
where
    O: ModuleOracle,
    B: BottleneckOracle,
{
    let bounds = resolve_bounds(oracle, module1, Some(module2), params.fixed_bounds)?;
    let lines = matching_lines(&bounds, params)?;
    debug!("matching distance over {} lines", lines.len());

    let bars1 = slice_barcodes(oracle, module1, &lines)?;
    let bars2 = slice_barcodes(oracle, module2, &lines)?;
    match_barcodes(bottleneck, &lines, &bars1, &bars2, params.normalize, &bounds)
}
