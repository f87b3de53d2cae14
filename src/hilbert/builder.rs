//! Hilbert functions from bigraded Betti numbers

use ndarray::{s, Array2};
use tracing::{debug, warn};

use super::dimension::Dimension;
use super::split_mat::SplitMat;
use crate::error::{DistanceError, Result};
use crate::topology::{BettiGenerator, MultiBetti};

fn axis(grades: &[f64], name: &str) -> Result<Dimension> {
    match grades {
        [lower, upper @ ..] if !upper.is_empty() => Dimension::new(*lower, upper.to_vec()),
        _ => Err(DistanceError::InvalidDimension(format!(
            "{name}-grades need at least two values, got {}",
            grades.len()
        ))),
    }
}

fn apply(mat: &mut Array2<f64>, generators: &[BettiGenerator], sign: f64) -> Result<()> {
    let (rows, cols) = mat.dim();
    for g in generators {
        if g.y > rows || g.x > cols {
            return Err(DistanceError::InvalidDimension(format!(
                "generator at grade index ({}, {}) outside {}x{} grid",
                g.x, g.y, cols, rows
            )));
        }
        let mut staircase = mat.slice_mut(s![g.y.., g.x..]);
        staircase += sign * g.multiplicity as f64;
    }
    Ok(())
}

/// Hilbert function of a module as a [`SplitMat`].
///
/// Rows follow the y-grades and columns the x-grades. Each ξ₀ generator at
/// `(x, y)` adds its multiplicity to every cell with row ≥ y and column
/// ≥ x; each ξ₁ generator subtracts. ξ₂ does not enter. Generators on the
/// last grade fall outside every cell and contribute nothing.
pub fn betti_to_splitmat(betti: &MultiBetti) -> Result<SplitMat> {
    let rows = axis(&betti.grades.y, "y")?;
    let cols = axis(&betti.grades.x, "x")?;

    let mut mat = Array2::<f64>::zeros((rows.len(), cols.len()));
    apply(&mut mat, &betti.xi_0, 1.0)?;
    apply(&mut mat, &betti.xi_1, -1.0)?;

    let negative = mat.iter().filter(|&&v| v < 0.0).count();
    if negative > 0 {
        warn!("clamped {} negative Hilbert function cells to zero", negative);
        mat.mapv_inplace(|v| v.max(0.0));
    }
    debug!(
        generators = betti.generator_count(),
        euler = betti.euler_characteristic(),
        "Hilbert function on {}x{} grid",
        rows.len(),
        cols.len()
    );

    SplitMat::new(mat, rows, cols)
}

/// L² distance between the Hilbert functions of two modules
pub fn hilbert_distance(a: &MultiBetti, b: &MultiBetti) -> Result<f64> {
    Ok(betti_to_splitmat(a)?.distance(&betti_to_splitmat(b)?))
}
