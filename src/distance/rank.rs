//! Rank Invariant and its Weighted L¹ Norm
//!
//! For grades a ≤ b the rank invariant rk M(a, b) is the rank of the
//! structure map M(a) → M(b). It is read off a single slice: on the line
//! through a and b, it counts the bars born at or before a and dying
//! strictly after b.
//!
//! ## Numerical Caveat
//!
//! Line parameters are computed in floating point, so the rank returned
//! may be the rank at points a', b' arbitrarily close to a, b. Near bar
//! endpoints the two can differ. This is fine for statistical use but not
//! for boundary-exact questions.
//!
//! ## Norm
//!
//! rank_norm integrates |rk M(a, b) − rk N(a, b)| over comparable pairs of
//! a uniform g × g point grid. There are O(g⁴) pairs; this enumeration
//! dominates the cost. Pairs on a common line share one slice query.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use super::matching::{resolve_bounds, slope_weight};
use crate::config::RankNormParams;
use crate::error::{DistanceError, Result};
use crate::geometry::{line_parameter, slope_offset, Line, Point};
use crate::oracle::{expect_len, ModuleOracle};
use crate::topology::Barcode;

/// Rank read from the barcode of a line through both points
fn rank_on_line(code: &Barcode, line: &Line, a: Point, b: Point) -> u32 {
    code.count_spanning(line_parameter(line, a), line_parameter(line, b))
}

/// Rank of the structure map of `module` from grade `a` to grade `b`.
///
/// Requires `a <= b` componentwise; `a == b` is answered on the vertical
/// line through the point.
pub fn rank<O: ModuleOracle>(oracle: &O, module: &O::Module, a: Point, b: Point) -> Result<u32> {
    if !a.le(&b) {
        return Err(DistanceError::UnorderedPoints { a, b });
    }
    let line = slope_offset(a, b);
    let codes = expect_len(oracle.barcodes(module, &[line])?, 1)?;
    Ok(rank_on_line(&codes[0], &line, a, b))
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// A grid pair and the index of its line in the deduplicated line list
struct GridPair {
    a: Point,
    b: Point,
    line: usize,
}

/// Strictly comparable grid pairs and the distinct lines through them.
///
/// Grid points are `lower + (i·sx, j·sy)` for `i, j < g`. Pairs sharing an
/// axis are left out since they carry zero weight.
fn grid_pairs(lower: Point, (sx, sy): (f64, f64), g: usize) -> (Vec<GridPair>, Vec<Line>) {
    let point = |i: usize, j: usize| Point::new(lower.x + i as f64 * sx, lower.y + j as f64 * sy);

    let mut pairs = Vec::new();
    let mut lines = Vec::new();
    // A grid line is fixed by its reduced direction (p, q) and q·i − p·j
    let mut line_ids: HashMap<(usize, usize, i64), usize> = HashMap::new();

    for i1 in 0..g {
        for j1 in 0..g {
            for i2 in i1 + 1..g {
                for j2 in j1 + 1..g {
                    let (di, dj) = (i2 - i1, j2 - j1);
                    let d = gcd(di, dj);
                    let (p, q) = (di / d, dj / d);
                    let key = (p, q, (q * i1) as i64 - (p * j1) as i64);

                    let a = point(i1, j1);
                    let b = point(i2, j2);
                    let line = *line_ids.entry(key).or_insert_with(|| {
                        lines.push(slope_offset(a, b));
                        lines.len() - 1
                    });
                    pairs.push(GridPair { a, b, line });
                }
            }
        }
    }
    (pairs, lines)
}

/// Weighted L¹ norm of the rank invariant of `module1`, or of its difference
/// with `module2`.
///
/// The rectangle is `params.fixed_bounds`, or the bounds of the module(s).
/// Ranks below `minimum_rank` count as 0. Pairs sharing an x or y
/// coordinate get weight 0; the others get the matching-distance slope
/// weight when `use_weights` is set, else 1. The volume element is
/// (Δx·Δy/g²)², or 1/g⁴ when normalized.
pub fn rank_norm<O: ModuleOracle>(
    oracle: &O,
    module1: &O::Module,
    module2: Option<&O::Module>,
    params: &RankNormParams,
) -> Result<f64> {
    let g = params.grid_size;
    if g < 2 {
        return Err(DistanceError::InvalidGridSize { min: 2, got: g });
    }
    let bounds = resolve_bounds(oracle, module1, module2, params.fixed_bounds)?;
    let (dx, dy) = bounds.require_area()?;
    let step = (dx / g as f64, dy / g as f64);

    let (pairs, lines) = grid_pairs(bounds.lower(), step, g);
    debug!("rank norm over {} pairs on {} lines", pairs.len(), lines.len());

    let bars1 = expect_len(oracle.barcodes(module1, &lines)?, lines.len())?;
    let bars2 = match module2 {
        Some(m) => Some(expect_len(oracle.barcodes(m, &lines)?, lines.len())?),
        None => None,
    };

    let volume = if params.normalize {
        (1.0 / g as f64).powi(4)
    } else {
        (step.0 * step.1).powi(2)
    };
    let extent = params.normalize.then_some((dx, dy));
    let clamp = |r: u32| if r < params.minimum_rank { 0 } else { r };

    let total = pairs
        .par_iter()
        .map(|pair| {
            let line = &lines[pair.line];
            let r1 = clamp(rank_on_line(&bars1[pair.line], line, pair.a, pair.b));
            let r2 = bars2
                .as_ref()
                .map_or(0, |bars| clamp(rank_on_line(&bars[pair.line], line, pair.a, pair.b)));
            if r1 == r2 {
                return 0.0;
            }
            let weight = if params.use_weights {
                slope_weight((pair.b.y - pair.a.y) / (pair.b.x - pair.a.x), extent)
            } else {
                1.0
            };
            weight * volume * (r1 as f64 - r2 as f64).abs()
        })
        .sum();
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::geometry::Bounds;
    use crate::topology::{Bar, MultiBetti};
    use std::cell::Cell;

    /// Module whose rank invariant is `rank` for every comparable pair
    struct Constant {
        rank: u32,
        calls: Cell<usize>,
    }

    impl Constant {
        fn new(rank: u32) -> Self {
            Self { rank, calls: Cell::new(0) }
        }
    }

    impl ModuleOracle for Constant {
        type Module = ();

        fn barcodes(&self, _: &(), lines: &[Line]) -> std::result::Result<Vec<Barcode>, OracleError> {
            self.calls.set(self.calls.get() + 1);
            let code = if self.rank == 0 {
                Barcode::default()
            } else {
                Barcode::new(vec![Bar::new(f64::NEG_INFINITY, f64::INFINITY, self.rank)])
            };
            Ok(vec![code; lines.len()])
        }

        fn bounds(&self, _: &()) -> std::result::Result<Bounds, OracleError> {
            Ok(Bounds::new(Point::new(0.0, 0.0), Point::new(4.0, 4.0)).unwrap())
        }

        fn multi_betti(&self, _: &()) -> std::result::Result<MultiBetti, OracleError> {
            Ok(MultiBetti::default())
        }
    }

    fn params(grid_size: usize) -> RankNormParams {
        RankNormParams {
            grid_size,
            ..RankNormParams::default()
        }
    }

    #[test]
    fn test_rank_rejects_unordered() {
        let oracle = Constant::new(1);
        let err = rank(&oracle, &(), Point::new(1.0, 0.0), Point::new(0.0, 2.0)).unwrap_err();
        assert!(matches!(err, DistanceError::UnorderedPoints { .. }));
        assert_eq!(oracle.calls.get(), 0);
    }

    #[test]
    fn test_rank_equal_points_allowed() {
        let oracle = Constant::new(3);
        let p = Point::new(1.0, 1.0);
        assert_eq!(rank(&oracle, &(), p, p).unwrap(), 3);
    }

    #[test]
    fn test_rank_reads_slice() {
        struct Slice;
        impl ModuleOracle for Slice {
            type Module = ();
            fn barcodes(&self, _: &(), lines: &[Line]) -> std::result::Result<Vec<Barcode>, OracleError> {
                // Along the diagonal: one bar over [0, 2), two over [0, 10)
                assert_eq!(lines.len(), 1);
                assert!((lines[0].slope - 45.0).abs() < 1e-12);
                Ok(vec![Barcode::new(vec![Bar::new(0.0, 2.0, 1), Bar::new(0.0, 10.0, 2)])])
            }
            fn bounds(&self, _: &()) -> std::result::Result<Bounds, OracleError> {
                Err(OracleError::Rejected("unused".into()))
            }
            fn multi_betti(&self, _: &()) -> std::result::Result<MultiBetti, OracleError> {
                Err(OracleError::Rejected("unused".into()))
            }
        }

        let a = Point::new(0.0, 0.0);
        // |b - a| = sqrt(2) < 2: all three bars span
        assert_eq!(rank(&Slice, &(), a, Point::new(1.0, 1.0)).unwrap(), 3);
        // |b - a| = 3 sqrt(2) > 2: only the long bars
        assert_eq!(rank(&Slice, &(), a, Point::new(3.0, 3.0)).unwrap(), 2);
    }

    #[test]
    fn test_grid_pairs_share_lines() {
        let (pairs, lines) = grid_pairs(Point::new(0.0, 0.0), (1.0, 1.0), 3);
        // (3 choose 2)² strictly comparable pairs
        assert_eq!(pairs.len(), 9);
        // (0,0)-(1,1), (1,1)-(2,2), (0,0)-(2,2) are on the diagonal
        assert_eq!(lines.len(), 7);
        for pair in &pairs {
            let line = &lines[pair.line];
            let through = slope_offset(pair.a, pair.b);
            assert!((line.slope - through.slope).abs() < 1e-9);
            assert!((line.offset - through.offset).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rank_norm_constant_rank_integrates_pairs() {
        let oracle = Constant::new(1);
        let g = 65;
        let val = rank_norm(&oracle, &(), None, &params(g)).unwrap();

        let comparable = (g * (g - 1) / 2) as f64;
        let volume = (16.0 / (g * g) as f64).powi(2);
        assert!((val - comparable * comparable * volume).abs() < 1e-6);
        // Area² / 4 in the limit
        assert!((val - 64.0).abs() < 2.0);
        // One batched query
        assert_eq!(oracle.calls.get(), 1);
    }

    #[test]
    fn test_rank_norm_normalized() {
        let oracle = Constant::new(1);
        let mut p = params(40);
        p.normalize = true;
        let val = rank_norm(&oracle, &(), None, &p).unwrap();
        assert!((val - 0.25).abs() < 0.02);
    }

    #[test]
    fn test_rank_norm_difference_and_threshold() {
        let oracle = Constant::new(2);
        let same = rank_norm(&oracle, &(), Some(&()), &params(6)).unwrap();
        assert_eq!(same, 0.0);
        assert_eq!(oracle.calls.get(), 2);

        let mut p = params(6);
        p.minimum_rank = 3;
        assert_eq!(rank_norm(&oracle, &(), None, &p).unwrap(), 0.0);
    }

    #[test]
    fn test_rank_norm_weights_shrink() {
        let oracle = Constant::new(1);
        let plain = rank_norm(&oracle, &(), None, &params(8)).unwrap();
        let mut p = params(8);
        p.use_weights = true;
        let weighted = rank_norm(&oracle, &(), None, &p).unwrap();
        assert!(weighted > 0.0);
        assert!(weighted <= plain * 0.5_f64.sqrt() + 1e-12);
    }

    #[test]
    fn test_rank_norm_guards() {
        let oracle = Constant::new(1);
        assert!(matches!(
            rank_norm(&oracle, &(), None, &params(1)),
            Err(DistanceError::InvalidGridSize { min: 2, got: 1 })
        ));

        let mut p = params(4);
        p.fixed_bounds = Some(Bounds::new(Point::new(0.0, 0.0), Point::new(0.0, 3.0)).unwrap());
        assert!(matches!(
            rank_norm(&oracle, &(), None, &p),
            Err(DistanceError::DegenerateRectangle { axis: 0 })
        ));
    }
}
