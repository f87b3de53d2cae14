//! Topology Module: Query Results of the Persistence Engine
//!
//! The persistence engine turns a bifiltration into a 2-parameter module
//! and answers two kinds of questions about it that this crate consumes:
//! - barcodes of the 1-parameter slices along given lines
//! - bigraded Betti numbers on the module's grade grid
//!
//! ## Mathematical Background
//!
//! Restricting a 2-parameter module M to a line L of positive slope gives a
//! 1-parameter module M|L, which decomposes into intervals: its barcode.
//! The rank of M(a → b) for a ≤ b on L equals the number of intervals of
//! M|L containing both a and b.

mod barcode;
mod betti;

pub use barcode::{Bar, Barcode};
pub use betti::{BettiGenerator, Grades, MultiBetti};
