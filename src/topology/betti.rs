//! Multi-graded Betti Numbers
//!
//! For a 2-parameter module on a finite grid, the bigraded Betti numbers
//! locate generators and relations:
//!
//! - ξ₀: births of generators
//! - ξ₁: relations (cancel earlier births)
//! - ξ₂: relations among relations
//!
//! Each is a list of grid vertices (indices into the x- and y-grades)
//! tagged with a multiplicity. Together they determine the Hilbert function
//! of the module combinatorially.

use serde::{Deserialize, Serialize};

/// A Betti generator at grade indices `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettiGenerator {
    pub x: usize,
    pub y: usize,
    pub multiplicity: u32,
}

impl BettiGenerator {
    pub fn new(x: usize, y: usize, multiplicity: u32) -> Self {
        Self { x, y, multiplicity }
    }
}

/// Sorted grade values along each axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grades {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Bigraded Betti numbers of a module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiBetti {
    pub grades: Grades,
    pub xi_0: Vec<BettiGenerator>,
    pub xi_1: Vec<BettiGenerator>,
    pub xi_2: Vec<BettiGenerator>,
}

impl MultiBetti {
    pub fn new(
        grades: Grades,
        xi_0: Vec<BettiGenerator>,
        xi_1: Vec<BettiGenerator>,
        xi_2: Vec<BettiGenerator>,
    ) -> Self {
        Self { grades, xi_0, xi_1, xi_2 }
    }

    /// Total ξ₀ multiplicity
    pub fn generator_count(&self) -> u64 {
        self.xi_0.iter().map(|g| g.multiplicity as u64).sum()
    }

    /// Euler characteristic of the resolution χ = ξ₀ - ξ₁ + ξ₂
    pub fn euler_characteristic(&self) -> i64 {
        let sum = |xi: &[BettiGenerator]| xi.iter().map(|g| g.multiplicity as i64).sum::<i64>();
        sum(&self.xi_0) - sum(&self.xi_1) + sum(&self.xi_2)
    }
}
