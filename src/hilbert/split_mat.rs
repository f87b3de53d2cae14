//! Piecewise-constant functions on non-uniform 2D grids
//!
//! A `SplitMat` is a matrix of cell values with one [`Dimension`] per axis.
//! Refining the grid (`add_row`, `add_col`) never changes the function it
//! represents; arithmetic first refines both operands onto the merged grid.

use std::ops::{Add, Neg, Sub};

use ndarray::{Array2, Axis};

use super::dimension::{Dimension, DimensionQuery};
use crate::error::{DistanceError, Result};

/// Matrix of cell values over a row partition and a column partition
#[derive(Debug, Clone, PartialEq)]
pub struct SplitMat {
    mat: Array2<f64>,
    dims: [Dimension; 2],
}

/// Copy of `mat` with a lane inserted at `at` along `axis`; the new lane is
/// zero or a copy of the existing lane `copy_of`.
fn insert_lane(mat: &Array2<f64>, axis: Axis, at: usize, copy_of: Option<usize>) -> Array2<f64> {
    let (rows, cols) = mat.dim();
    let shape = if axis == Axis(0) { (rows + 1, cols) } else { (rows, cols + 1) };
    Array2::from_shape_fn(shape, |(i, j)| {
        let (lane, other) = if axis == Axis(0) { (i, j) } else { (j, i) };
        let source = if lane < at {
            Some(lane)
        } else if lane == at {
            copy_of
        } else {
            Some(lane - 1)
        };
        match (source, axis == Axis(0)) {
            (Some(k), true) => mat[[k, other]],
            (Some(k), false) => mat[[other, k]],
            (None, _) => 0.0,
        }
    })
}

/// For each cell of `refined`, the cell of `dim` containing it
fn source_cells(dim: &Dimension, refined: &Dimension) -> Vec<Option<usize>> {
    refined
        .upper_bounds()
        .iter()
        .map(|&edge| match dim.index(edge) {
            DimensionQuery::In(i) if edge > dim.lower_bound() => Some(i),
            _ => None,
        })
        .collect()
}

impl SplitMat {
    pub fn new(mat: Array2<f64>, rows: Dimension, cols: Dimension) -> Result<Self> {
        let expected = (rows.len(), cols.len());
        if mat.dim() != expected {
            return Err(DistanceError::ShapeMismatch {
                expected,
                actual: mat.dim(),
            });
        }
        Ok(Self { mat, dims: [rows, cols] })
    }

    /// Unit cells starting at 0 on both axes
    pub fn from_matrix(mat: Array2<f64>) -> Result<Self> {
        let (r, c) = mat.dim();
        let rows = Dimension::unit(r)?;
        let cols = Dimension::unit(c)?;
        Self::new(mat, rows, cols)
    }

    pub fn mat(&self) -> &Array2<f64> {
        &self.mat
    }

    pub fn rows(&self) -> &Dimension {
        &self.dims[0]
    }

    pub fn cols(&self) -> &Dimension {
        &self.dims[1]
    }

    pub fn index(&self, row_value: f64, col_value: f64) -> (DimensionQuery, DimensionQuery) {
        (self.dims[0].index(row_value), self.dims[1].index(col_value))
    }

    fn add_lane(&self, axis: Axis, bound: f64) -> Result<SplitMat> {
        let k = axis.index();
        let dim = &self.dims[k];
        let refined = dim.add_bound(bound)?;

        let mat = match dim.index(bound) {
            // Zero-width first cell was widened in place
            DimensionQuery::Low if refined.len() == dim.len() => {
                let mut mat = self.mat.clone();
                mat.index_axis_mut(axis, 0).fill(0.0);
                mat
            }
            DimensionQuery::Low => insert_lane(&self.mat, axis, 0, None),
            DimensionQuery::High => insert_lane(&self.mat, axis, dim.len(), None),
            DimensionQuery::In(i) if !dim.is_bound(bound) => insert_lane(&self.mat, axis, i, Some(i)),
            DimensionQuery::In(_) => return Ok(self.clone()),
        };

        let mut dims = self.dims.clone();
        dims[k] = refined;
        Ok(SplitMat { mat, dims })
    }

    /// Refine the rows with a new boundary; the represented function is
    /// unchanged. A NaN boundary is rejected.
    pub fn add_row(&self, bound: f64) -> Result<SplitMat> {
        self.add_lane(Axis(0), bound)
    }

    /// Column counterpart of [`SplitMat::add_row`]
    pub fn add_col(&self, bound: f64) -> Result<SplitMat> {
        self.add_lane(Axis(1), bound)
    }

    /// Shift by `(row_shift, col_shift)`
    pub fn translate(&self, (row_shift, col_shift): (f64, f64)) -> SplitMat {
        SplitMat {
            mat: self.mat.clone(),
            dims: [self.dims[0].translate(row_shift), self.dims[1].translate(col_shift)],
        }
    }

    pub fn scale(&self, (row_factor, col_factor): (f64, f64)) -> Result<SplitMat> {
        Ok(SplitMat {
            mat: self.mat.clone(),
            dims: [self.dims[0].scale(row_factor)?, self.dims[1].scale(col_factor)?],
        })
    }

    /// This function refined onto the merged grid of `self` and `other`.
    ///
    /// Every merged cell lies inside exactly one cell of `self` or outside
    /// its domain, so each takes that cell's value or zero.
    pub fn make_compatible(&self, other: &SplitMat) -> SplitMat {
        let rows = self.dims[0].merge(&other.dims[0]);
        let cols = self.dims[1].merge(&other.dims[1]);
        let ri = source_cells(&self.dims[0], &rows);
        let ci = source_cells(&self.dims[1], &cols);
        let mat = Array2::from_shape_fn((ri.len(), ci.len()), |(i, j)| match (ri[i], ci[j]) {
            (Some(r), Some(c)) => self.mat[[r, c]],
            _ => 0.0,
        });
        SplitMat { mat, dims: [rows, cols] }
    }

    /// Cell values multiplied by cell area
    fn area_weighted(&self) -> Array2<f64> {
        let rl = self.dims[0].lengths();
        let cl = self.dims[1].lengths();
        let mut out = self.mat.clone();
        for ((i, j), v) in out.indexed_iter_mut() {
            *v *= rl[i] * cl[j];
        }
        out
    }

    /// `self - other` with every cell multiplied by its area
    pub fn weighted_difference(&self, other: &SplitMat) -> SplitMat {
        let diff = self - other;
        SplitMat {
            mat: diff.area_weighted(),
            dims: diff.dims,
        }
    }

    /// L² distance between the two piecewise-constant functions:
    /// sqrt(Σ diff_ij² · row_i · col_j) over the merged grid.
    ///
    /// Refining either operand leaves the value unchanged.
    pub fn distance(&self, other: &SplitMat) -> f64 {
        let diff = self - other;
        (&diff.mat * &diff.area_weighted()).sum().sqrt()
    }
}

impl Neg for &SplitMat {
    type Output = SplitMat;

    fn neg(self) -> SplitMat {
        SplitMat {
            mat: -&self.mat,
            dims: self.dims.clone(),
        }
    }
}

impl Neg for SplitMat {
    type Output = SplitMat;

    fn neg(self) -> SplitMat {
        -&self
    }
}

impl Add for &SplitMat {
    type Output = SplitMat;

    fn add(self, other: Self) -> SplitMat {
        let left = self.make_compatible(other);
        let right = other.make_compatible(self);
        SplitMat {
            mat: &left.mat + &right.mat,
            dims: left.dims,
        }
    }
}

impl Add for SplitMat {
    type Output = SplitMat;

    fn add(self, other: Self) -> SplitMat {
        &self + &other
    }
}

impl Sub for &SplitMat {
    type Output = SplitMat;

    fn sub(self, other: Self) -> SplitMat {
        self + &(-other)
    }
}

impl Sub for SplitMat {
    type Output = SplitMat;

    fn sub(self, other: Self) -> SplitMat {
        &self - &other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Exp};

    fn arange(rows: usize, cols: usize) -> Array2<f64> {
        Array::range(0.0, (rows * cols) as f64, 1.0)
            .into_shape((rows, cols))
            .unwrap()
    }

    fn random_dimension(rng: &mut StdRng) -> Dimension {
        let widths = Exp::new(1.0).unwrap();
        let mut at: f64 = rng.gen_range(-2.0..2.0);
        let lower = at;
        let cells = rng.gen_range(1..5);
        let upper = (0..cells)
            .map(|_| {
                at += 0.05 + widths.sample(rng);
                at
            })
            .collect();
        Dimension::new(lower, upper).unwrap()
    }

    fn random_split_mat(rng: &mut StdRng) -> SplitMat {
        let rows = random_dimension(rng);
        let cols = random_dimension(rng);
        let mat = Array2::from_shape_fn((rows.len(), cols.len()), |_| rng.gen_range(0..10) as f64);
        SplitMat::new(mat, rows, cols).unwrap()
    }

    #[test]
    fn test_shape_check() {
        let err = SplitMat::new(Array2::zeros((2, 2)), Dimension::unit(3).unwrap(), Dimension::unit(2).unwrap());
        assert!(matches!(
            err,
            Err(DistanceError::ShapeMismatch {
                expected: (3, 2),
                actual: (2, 2)
            })
        ));
    }

    #[test]
    fn test_add_row_and_col() {
        let s = SplitMat::from_matrix(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();

        let below = s.add_row(-1.0).unwrap();
        assert_eq!(below.mat(), &array![[0.0, 0.0], [1.0, 2.0], [3.0, 4.0]]);
        let above = s.add_row(3.0).unwrap();
        assert_eq!(above.mat(), &array![[1.0, 2.0], [3.0, 4.0], [0.0, 0.0]]);
        let split = s.add_row(1.5).unwrap();
        assert_eq!(split.mat(), &array![[1.0, 2.0], [3.0, 4.0], [3.0, 4.0]]);
        assert_eq!(split.rows().upper_bounds(), &[1.0, 1.5, 2.0]);
        assert_eq!(s.add_row(1.0).unwrap(), s);

        let col = s.add_col(0.5).unwrap();
        assert_eq!(col.mat(), &array![[1.0, 1.0, 2.0], [3.0, 3.0, 4.0]]);
        assert_eq!(col.cols().upper_bounds(), &[0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_nan_boundary_is_rejected() {
        let s = SplitMat::from_matrix(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(s.index(f64::NAN, 0.5), (DimensionQuery::High, DimensionQuery::In(0)));
        assert!(matches!(s.add_row(f64::NAN), Err(DistanceError::InvalidDimension(_))));
        assert!(matches!(s.add_col(f64::NAN), Err(DistanceError::InvalidDimension(_))));
    }

    #[test]
    fn test_add_translated() {
        let s1 = SplitMat::from_matrix(arange(4, 4)).unwrap();
        let s2 = SplitMat::from_matrix(arange(3, 3)).unwrap().translate((0.5, 0.5));
        let sum = &s1 + &s2;

        // Boundaries 0, .5, 1, 1.5, ..., 4
        assert_eq!(sum.mat().dim(), (8, 8));
        assert_eq!(sum.mat()[[1, 1]], 0.0);
        // Cell (3.5, 4]² lies only in s1's last cell
        assert_eq!(sum.mat()[[7, 7]], 15.0);
        // Cell (3, 3.5]² is s1[3][3] + s2[2][2]
        assert_eq!(sum.mat()[[6, 6]], 23.0);
    }

    #[test]
    fn test_lengths_after_refinement() {
        let s = SplitMat::new(
            Array2::zeros((5, 1)),
            Dimension::new(-2.0, vec![-1.0, 2.0, 2.5, 3.0, 5.0]).unwrap(),
            Dimension::unit(1).unwrap(),
        )
        .unwrap();
        assert_eq!(s.rows().lengths(), vec![1.0, 3.0, 0.5, 0.5, 2.0]);
    }

    #[test]
    fn test_distance_across_resolutions() {
        let m1 = SplitMat::new(
            Array2::eye(4),
            Dimension::new(0.0, vec![0.5, 1.0, 1.5, 2.0]).unwrap(),
            Dimension::new(0.0, vec![0.5, 1.0, 1.5, 2.0]).unwrap(),
        )
        .unwrap();
        let m2 = SplitMat::new(
            Array2::eye(2),
            Dimension::new(0.0, vec![1.0, 2.0]).unwrap(),
            Dimension::new(0.0, vec![1.0, 2.0]).unwrap(),
        )
        .unwrap();

        let diff = &m1 - &m2;
        let expected = array![
            [0.0, -1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, -1.0],
            [0.0, 0.0, -1.0, 0.0],
        ];
        assert_eq!(diff.mat(), &expected);
        assert_eq!(m1.weighted_difference(&m2).mat(), &(expected * 0.25));

        // Four cells of area 1/4 with difference 1
        assert!((m1.distance(&m2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale() {
        let s = SplitMat::from_matrix(Array2::ones((2, 2))).unwrap();
        let scaled = s.scale((2.0, 0.5)).unwrap();
        assert_eq!(scaled.rows().upper_bounds(), &[2.0, 4.0]);
        assert_eq!(scaled.cols().upper_bounds(), &[0.5, 1.0]);
        assert!(matches!(s.scale((0.0, 1.0)), Err(DistanceError::InvalidScale(_))));
        assert!(s.scale((1.0, -1.0)).is_err());
    }

    #[test]
    fn test_neg_and_owned_ops() {
        let a = SplitMat::from_matrix(array![[1.0, -2.0]]).unwrap();
        let b = SplitMat::from_matrix(array![[1.0, 1.0]]).unwrap();
        assert_eq!((-a.clone()).mat(), &array![[-1.0, 2.0]]);
        assert_eq!((a.clone() + b.clone()).mat(), &array![[2.0, -1.0]]);
        assert_eq!((a - b).mat(), &array![[0.0, -3.0]]);
    }

    #[test]
    fn test_distance_is_a_metric() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let a = random_split_mat(&mut rng);
            let b = random_split_mat(&mut rng);
            let c = random_split_mat(&mut rng);

            assert_eq!(a.distance(&a), 0.0);
            let ab = a.distance(&b);
            assert!((ab - b.distance(&a)).abs() < 1e-9);
            assert!(a.distance(&c) <= ab + b.distance(&c) + 1e-9);
        }
    }

    #[test]
    fn test_compatible_with_zero_width_cell() {
        let pinched = SplitMat::new(
            array![[5.0], [1.0]],
            Dimension::new(0.0, vec![0.0, 1.0]).unwrap(),
            Dimension::unit(1).unwrap(),
        )
        .unwrap();
        let plain = SplitMat::from_matrix(array![[2.0]]).unwrap();
        let sum = &pinched + &plain;
        assert_eq!(sum.rows(), pinched.rows());
        assert_eq!(sum.mat()[[1, 0]], 3.0);
        assert!((pinched.distance(&plain) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_make_compatible_matches_add_row() {
        let s = SplitMat::from_matrix(array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let t = SplitMat::from_matrix(Array2::zeros((1, 1))).unwrap().translate((1.5, 0.0));
        let refined = s.make_compatible(&t);
        assert_eq!(refined, s.add_row(1.5).unwrap().add_row(2.5).unwrap());
    }

    #[test]
    fn test_distance_ignores_refinement() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let a = random_split_mat(&mut rng);
            let b = random_split_mat(&mut rng);
            let x: f64 = rng.gen_range(-3.0..8.0);
            let refined = a.add_row(x).unwrap().add_col(x).unwrap();
            assert!((refined.distance(&b) - a.distance(&b)).abs() < 1e-9);
        }
    }
}
