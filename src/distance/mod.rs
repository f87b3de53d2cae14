//! Distance Module: Line-Sampled Distances and Norms
//!
//! - `matching`: approximate matching distance (weighted max over slices)
//! - `rank`: rank invariant and its weighted L¹ norm
//! - `permutation`: permutation test built on the matching distance
//!
//! ## Mathematical Background
//!
//! Both the matching distance and the rank norm sample a structured grid of
//! slice queries inside a bounding rectangle and aggregate them under the
//! same slope weighting w(m) = 1/sqrt(1 + max(m, 1/m)²). The matching
//! distance takes a maximum over lines; the rank norm a sum over pairs of
//! comparable grid points.

mod matching;
mod permutation;
mod rank;

pub use matching::{calculate_match, matching_distance, resolve_bounds, slope_weight};
pub use permutation::{permutation_test, test_statistic, PermutationTest};
pub use rank::{rank, rank_norm};
