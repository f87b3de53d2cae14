//! Oracle Traits: the Boundary to External Engines
//!
//! Persistent homology and bottleneck matching are not computed here. The
//! distance engine talks to them through two traits, so the same
//! algorithms run against the process-backed adapters or in-memory fakes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     ModuleOracle Trait                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + barcodes(module, lines) - One barcode per line, in order │
//! │  + bounds(module)          - Rectangle the module lives on  │
//! │  + multi_betti(module)     - Bigraded Betti numbers         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   BottleneckOracle Trait                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  + distance(left, right)        - d_B of two barcodes       │
//! │  + multi_distance(lefts, rights) - Batched, pairwise        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use crate::error::OracleError;
use crate::geometry::{Bounds, Line};
use crate::topology::{Barcode, MultiBetti};

/// Source of module queries
pub trait ModuleOracle {
    /// Opaque module handle; never inspected by this crate
    type Module;

    /// Barcodes of the slices along `lines`, one per line in the same order.
    ///
    /// Callers batch every line they need into one call.
    fn barcodes(&self, module: &Self::Module, lines: &[Line]) -> Result<Vec<Barcode>, OracleError>;

    /// Bounding rectangle of the module
    fn bounds(&self, module: &Self::Module) -> Result<Bounds, OracleError>;

    /// Bigraded Betti numbers of the module
    fn multi_betti(&self, module: &Self::Module) -> Result<MultiBetti, OracleError>;
}

/// Bottleneck distance between 1-parameter barcodes
///
/// Implementations return `0` for two empty barcodes and a finite value
/// when exactly one side is empty.
pub trait BottleneckOracle {
    fn distance(&self, left: &Barcode, right: &Barcode) -> Result<f64, OracleError>;

    /// Pairwise distances `d(lefts[i], rights[i])`
    fn multi_distance(&self, lefts: &[Barcode], rights: &[Barcode]) -> Result<Vec<f64>, OracleError> {
        if lefts.len() != rights.len() {
            return Err(OracleError::LengthMismatch {
                expected: lefts.len(),
                actual: rights.len(),
            });
        }
        lefts
            .iter()
            .zip(rights)
            .map(|(l, r)| self.distance(l, r))
            .collect()
    }
}

/// Checks a batched reply has one entry per query.
pub(crate) fn expect_len<T>(items: Vec<T>, expected: usize) -> Result<Vec<T>, OracleError> {
    if items.len() != expected {
        return Err(OracleError::LengthMismatch {
            expected,
            actual: items.len(),
        });
    }
    Ok(items)
}
