//! Permutation Test on Matching Distances
//!
//! Given a module and a collection of modules built from randomly permuted
//! versions of the same data, we ask how atypical the module is:
//!
//! 1. Every permuted module gets the statistic "mean matching distance to
//!    the other permuted modules" (the null distribution).
//! 2. The module itself gets "mean matching distance to the collection".
//! 3. The observed statistic is compared against the null distribution.
//!
//! All distances are computed over one common rectangle (the union of all
//! bounds unless fixed), so they share the same precision.

use ndarray::Array2;
use tracing::debug;

use super::matching::{match_barcodes, matching_distance, matching_lines, slice_barcodes};
use crate::config::MatchingParams;
use crate::error::{DistanceError, Result};
use crate::oracle::{BottleneckOracle, ModuleOracle};
use crate::topology::Barcode;

/// Outcome of a permutation test
#[derive(Debug, Clone)]
pub struct PermutationTest {
    /// Mean distance from the module to the permuted collection
    pub observed: f64,
    /// Per permuted module, mean distance to the rest of the collection
    pub null_statistics: Vec<f64>,
    /// Pairwise matching distances within the collection
    pub distances: Array2<f64>,
}

impl PermutationTest {
    /// Share of null statistics strictly below the observed one
    pub fn fraction_below(&self) -> f64 {
        if self.null_statistics.is_empty() {
            return 0.0;
        }
        let below = self.null_statistics.iter().filter(|&&s| s < self.observed).count();
        below as f64 / self.null_statistics.len() as f64
    }

    /// Share of null statistics at least as large as the observed one
    pub fn p_value(&self) -> f64 {
        if self.null_statistics.is_empty() {
            return 1.0;
        }
        1.0 - self.fraction_below()
    }
}

/// Mean matching distance from `module` to every module in `others`
pub fn test_statistic<O, B>(
    oracle: &O,
    bottleneck: &B,
    module: &O::Module,
    others: &[O::Module],
    params: &MatchingParams,
) -> Result<f64>
where
    O: ModuleOracle,
    B: BottleneckOracle,
{
    if others.is_empty() {
        return Err(DistanceError::EmptyCollection("test statistic needs at least one module"));
    }
    let mut sum = 0.0;
    for other in others {
        sum += matching_distance(oracle, bottleneck, module, other, params)?;
    }
    Ok(sum / others.len() as f64)
}

/// Compare `module` against a collection of permuted modules.
///
/// Needs at least two permuted modules so each has someone to be compared
/// with.
pub fn permutation_test<O, B>(
    oracle: &O,
    bottleneck: &B,
    module: &O::Module,
    permuted: &[O::Module],
    params: &MatchingParams,
) -> Result<PermutationTest>
where
    O: ModuleOracle,
    B: BottleneckOracle,
{
    let n = permuted.len();
    if n < 2 {
        return Err(DistanceError::EmptyCollection("permutation test needs at least two permuted modules"));
    }

    let bounds = match params.fixed_bounds {
        Some(b) => b,
        None => {
            let mut bounds = oracle.bounds(module)?;
            for m in permuted {
                bounds = bounds.union(&oracle.bounds(m)?);
            }
            bounds
        }
    };
    let lines = matching_lines(&bounds, params)?;
    debug!("permutation test over {} modules, {} lines", n, lines.len());

    // One barcode query per module, shared by every pair
    let own = slice_barcodes(oracle, module, &lines)?;
    let bars = permuted
        .iter()
        .map(|m| slice_barcodes(oracle, m, &lines))
        .collect::<Result<Vec<_>>>()?;
    let distance = |a: &[Barcode], b: &[Barcode]| match_barcodes(bottleneck, &lines, a, b, params.normalize, &bounds);

    let mut distances = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in i + 1..n {
            let d = distance(&bars[i], &bars[j])?;
            distances[[i, j]] = d;
            distances[[j, i]] = d;
        }
    }

    let null_statistics = distances
        .rows()
        .into_iter()
        .map(|row| row.sum() / (n - 1) as f64)
        .collect();
    let mut observed = 0.0;
    for other in &bars {
        observed += distance(&own, other)?;
    }
    let observed = observed / n as f64;

    Ok(PermutationTest {
        observed,
        null_statistics,
        distances,
    })
}
