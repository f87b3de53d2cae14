//! Barcodes of 1-parameter slices
//!
//! A bar [start, end) with multiplicity k stands for k identical
//! persistence intervals. Barcodes are produced by the module oracle, one
//! per queried line, and are read-only afterwards.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// A persistence interval [start, end) with multiplicity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub start: f64,
    pub end: f64,
    pub multiplicity: u32,
}

impl Bar {
    pub fn new(start: f64, end: f64, multiplicity: u32) -> Self {
        Self { start, end, multiplicity }
    }

    /// Lifetime of the feature
    pub fn persistence(&self) -> f64 {
        self.end - self.start
    }

    /// Is this an essential feature (infinite persistence)?
    pub fn is_essential(&self) -> bool {
        self.end.is_infinite()
    }

    /// `multiplicity` copies of this bar, each with multiplicity 1
    pub fn expand(&self) -> Vec<Bar> {
        vec![Bar::new(self.start, self.end, 1); self.multiplicity as usize]
    }

    /// `[start, end, multiplicity]`
    pub fn to_array(&self) -> [f64; 3] {
        [self.start, self.end, self.multiplicity as f64]
    }
}

/// Multiset of bars for one slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Barcode {
    pub bars: Vec<Bar>,
}

impl Barcode {
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Number of intervals counted with multiplicity
    pub fn total_multiplicity(&self) -> u64 {
        self.bars.iter().map(|b| b.multiplicity as u64).sum()
    }

    /// Same intervals with every multiplicity spelled out
    pub fn expand(&self) -> Barcode {
        Barcode::new(self.bars.iter().flat_map(|b| b.expand()).collect())
    }

    /// Rows `[start, end, multiplicity]`, shape `(len, 3)`
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((self.bars.len(), 3));
        for (i, bar) in self.bars.iter().enumerate() {
            for (j, v) in bar.to_array().into_iter().enumerate() {
                out[[i, j]] = v;
            }
        }
        out
    }

    /// Sum of multiplicities of bars alive on all of `[from, to]`:
    /// born at or before `from`, dying strictly after `to`.
    pub fn count_spanning(&self, from: f64, to: f64) -> u32 {
        self.bars
            .iter()
            .filter(|b| b.start <= from && b.end > to)
            .map(|b| b.multiplicity)
            .sum()
    }
}

impl FromIterator<Bar> for Barcode {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        Barcode::new(iter.into_iter().collect())
    }
}
