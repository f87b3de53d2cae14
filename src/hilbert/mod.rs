//! Hilbert Module: Piecewise-Constant Functions on Non-Uniform Grids
//!
//! The Hilbert function of a 2-parameter module, dim M(x, y), is constant
//! on the cells of the grade grid. This module stores such functions as
//! `SplitMat` values and compares them:
//! - `dimension`: one axis partitioned into half-open cells
//! - `split_mat`: matrix + row/column partitions, with refinement and arithmetic
//! - `builder`: Hilbert function from bigraded Betti numbers
//!
//! ## Mathematical Background
//!
//! From a minimal presentation, the Hilbert function is
//!
//!   HF(x, y) = Σ_{ξ₀ at (a,b) ≤ (x,y)} m  -  Σ_{ξ₁ at (a,b) ≤ (x,y)} m
//!
//! Two such functions on different grids are compared on the common
//! refinement of both grids, where the L² distance is
//!
//!   ‖HF₁ - HF₂‖ = sqrt(Σᵢⱼ (HF₁ - HF₂)ᵢⱼ² · rowᵢ · colⱼ)
//!
//! with rowᵢ, colⱼ the cell widths.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐    ┌────────────────────┐    ┌───────────────────┐
//! │  MultiBetti   │───▶│ betti_to_splitmat  │───▶│ SplitMat          │
//! │  (ξ₀, ξ₁)     │    │ (staircase sums)   │    │ make_compatible   │
//! └───────────────┘    └────────────────────┘    │ distance          │
//!                                                └───────────────────┘
//! ```

mod builder;
mod dimension;
mod split_mat;

pub use builder::{betti_to_splitmat, hilbert_distance};
pub use dimension::{Dimension, DimensionQuery};
pub use split_mat::SplitMat;
