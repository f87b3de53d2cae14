//! Non-uniform partitions of one axis
//!
//! A `Dimension` with lower bound l and boundaries u₀ < u₁ < … splits the
//! axis into cells (l, u₀], (u₀, u₁], … . Values below l or above the last
//! boundary fall outside every cell and are reported as `Low` / `High`.

use crate::error::{DistanceError, Result};

/// Where a value falls relative to a [`Dimension`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionQuery {
    Low,
    High,
    In(usize),
}

/// Partition of one axis into half-open cells
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    lower_bound: f64,
    upper_bounds: Vec<f64>,
}

impl Dimension {
    /// Requires at least one cell and `lower_bound ≤ u₀ < u₁ < …`.
    pub fn new(lower_bound: f64, upper_bounds: Vec<f64>) -> Result<Self> {
        let first = *upper_bounds
            .first()
            .ok_or_else(|| DistanceError::InvalidDimension("no upper bounds".into()))?;
        if !(lower_bound <= first) {
            return Err(DistanceError::InvalidDimension(format!(
                "lower bound {lower_bound} above first upper bound {first}"
            )));
        }
        if let Some(w) = upper_bounds.windows(2).find(|w| !(w[0] < w[1])) {
            return Err(DistanceError::InvalidDimension(format!(
                "upper bounds not strictly increasing at {} >= {}",
                w[0], w[1]
            )));
        }
        Ok(Self {
            lower_bound,
            upper_bounds,
        })
    }

    /// `cells` unit cells starting at 0
    pub fn unit(cells: usize) -> Result<Self> {
        Self::new(0.0, (1..=cells).map(|i| i as f64).collect())
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper_bounds
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.upper_bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper_bounds.is_empty()
    }

    fn last(&self) -> f64 {
        self.upper_bounds[self.upper_bounds.len() - 1]
    }

    /// Width of every cell
    pub fn lengths(&self) -> Vec<f64> {
        std::iter::once(self.lower_bound)
            .chain(self.upper_bounds.iter().copied())
            .collect::<Vec<_>>()
            .windows(2)
            .map(|w| w[1] - w[0])
            .collect()
    }

    pub fn translate(&self, increment: f64) -> Self {
        Self {
            lower_bound: self.lower_bound + increment,
            upper_bounds: self.upper_bounds.iter().map(|u| u + increment).collect(),
        }
    }

    /// Scale every boundary by a positive `factor`
    pub fn scale(&self, factor: f64) -> Result<Self> {
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(DistanceError::InvalidScale(factor));
        }
        Ok(Self {
            lower_bound: self.lower_bound * factor,
            upper_bounds: self.upper_bounds.iter().map(|u| u * factor).collect(),
        })
    }

    pub fn is_bound(&self, bound: f64) -> bool {
        if bound == self.lower_bound {
            return true;
        }
        let i = self.upper_bounds.partition_point(|&u| u < bound);
        i < self.upper_bounds.len() && self.upper_bounds[i] == bound
    }

    /// Cell containing `value`; NaN is reported as `High`
    pub fn index(&self, value: f64) -> DimensionQuery {
        if value < self.lower_bound {
            DimensionQuery::Low
        } else if value > self.last() || value.is_nan() {
            DimensionQuery::High
        } else {
            DimensionQuery::In(self.upper_bounds.partition_point(|&u| u < value))
        }
    }

    /// Same partition with `bound` as an extra cell edge.
    ///
    /// A zero-width first cell is widened to start at `bound` instead of
    /// gaining a neighbour, so the cell count is unchanged in that case.
    /// A NaN `bound` is an `InvalidDimension` error.
    pub fn add_bound(&self, bound: f64) -> Result<Self> {
        if bound.is_nan() {
            return Err(DistanceError::InvalidDimension("boundary is NaN".into()));
        }
        Ok(if bound < self.lower_bound && self.lower_bound == self.upper_bounds[0] {
            Self {
                lower_bound: bound,
                upper_bounds: self.upper_bounds.clone(),
            }
        } else if bound < self.lower_bound {
            let mut upper = Vec::with_capacity(self.len() + 1);
            upper.push(self.lower_bound);
            upper.extend_from_slice(&self.upper_bounds);
            Self {
                lower_bound: bound,
                upper_bounds: upper,
            }
        } else if bound > self.last() {
            let mut upper = self.upper_bounds.clone();
            upper.push(bound);
            Self {
                lower_bound: self.lower_bound,
                upper_bounds: upper,
            }
        } else if self.is_bound(bound) {
            self.clone()
        } else {
            let mut upper = self.upper_bounds.clone();
            let at = upper.partition_point(|&u| u < bound);
            upper.insert(at, bound);
            Self {
                lower_bound: self.lower_bound,
                upper_bounds: upper,
            }
        })
    }

    /// Common refinement of two partitions.
    ///
    /// The lower bound is the smaller one; when the lower bounds differ the
    /// larger one becomes a cell edge so both input regions stay
    /// distinguishable.
    pub fn merge(&self, other: &Dimension) -> Dimension {
        let mut upper: Vec<f64> = self
            .upper_bounds
            .iter()
            .chain(other.upper_bounds.iter())
            .copied()
            .collect();
        if self.lower_bound != other.lower_bound {
            upper.push(self.lower_bound.max(other.lower_bound));
        }
        upper.sort_by(f64::total_cmp);
        upper.dedup();
        Dimension {
            lower_bound: self.lower_bound.min(other.lower_bound),
            upper_bounds: upper,
        }
    }
}
