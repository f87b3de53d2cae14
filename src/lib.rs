//! # TDA-Module-Distance
//!
//! Distances and Norms between 2-Parameter Persistence Modules
//!
//! ## Theoretical Framework
//!
//! A bifiltration of a data set yields a 2-parameter persistence module M:
//! a vector space M(x, y) at every point of the plane with maps
//! M(a) → M(b) whenever a ≤ b. Such modules have no complete discrete
//! invariant, so they are compared through computable shadows:
//!
//! 1. **Matching distance**: the supremum over lines L of positive slope
//!    of the weighted bottleneck distance between the barcodes of M|L and
//!    N|L. A lower bound for the interleaving distance.
//!
//! 2. **Rank invariant norm**: the weighted L¹ norm of
//!    rk M(a → b) over comparable pairs of grid points.
//!
//! 3. **Hilbert distance**: the L² distance between the Hilbert functions
//!    dim M(x, y), built from bigraded Betti numbers.
//!
//! ## Architecture
//!
//! Computing slice barcodes and bottleneck distances is delegated to
//! external engines behind two traits:
//!
//! ```text
//! ┌──────────────┐   lines    ┌──────────────────┐
//! │  geometry    │──────────▶│  ModuleOracle     │── barcodes, bounds, Betti
//! │  line grids  │            │  (rivet_console)  │
//! └──────────────┘            └──────────────────┘
//!        │                            │ barcodes
//!        ▼                            ▼
//! ┌──────────────┐            ┌──────────────────┐
//! │  distance    │◀──────────│ BottleneckOracle  │
//! │  matching,   │  distances │ (bottleneck_dist) │
//! │  rank norm   │            └──────────────────┘
//! └──────────────┘
//! ```
//!
//! Each module is queried once per computation with the whole batch of
//! lines.
//!
//! ## References
//!
//! - Landi, "The rank invariant stability via interleavings" (2018)
//! - Kerber, Lesnick & Oudot, "Exact computation of the matching distance
//!   on 2-parameter persistence modules" (2019)
//! - Lesnick & Wright, "Interactive visualization of 2-D persistence
//!   modules" (2015)

pub mod config;
pub mod distance;
pub mod error;
pub mod geometry;
pub mod hilbert;
pub mod oracle;
pub mod topology;

pub use error::{DistanceError, OracleError, Result};

pub use config::{load_config, MatchingParams, OracleConfig, RankNormParams};

// Re-exports from geometry
pub use geometry::{
    find_offset,
    generate_lines,
    line_parameter,
    sample_slopes,
    slope_offset,
    Bounds,
    Line,
    Point,
};

// Re-exports from topology
pub use topology::{Bar, Barcode, BettiGenerator, Grades, MultiBetti};

// Re-exports from oracle
pub use oracle::{
    // Seams
    BottleneckOracle,
    ModuleOracle,
    // Process adapters
    HeraBottleneck,
    PrecomputedModule,
    RivetConsole,
};

// Re-exports from distance
pub use distance::{
    // Matching distance
    calculate_match,
    matching_distance,
    resolve_bounds,
    slope_weight,
    // Rank invariant
    rank,
    rank_norm,
    // Permutation test
    permutation_test,
    test_statistic,
    PermutationTest,
};

// Re-exports from hilbert
pub use hilbert::{betti_to_splitmat, hilbert_distance, Dimension, DimensionQuery, SplitMat};
