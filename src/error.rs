//! Error types for distance computations and oracle round-trips.
//!
//! Invalid input and numerically undefined regimes are reported as
//! [`DistanceError`] values. Failures of the external persistence engine or
//! bottleneck tool are wrapped in [`OracleError`] and propagated unchanged;
//! nothing here retries.

use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::Point;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DistanceError>;

/// Errors raised by the distance and norm computations.
#[derive(Debug, Error)]
pub enum DistanceError {
    /// A rectangle with `lower > upper` on some axis.
    #[error("invalid bounds on axis {axis}: lower {lower} > upper {upper}")]
    InvalidBounds {
        axis: usize,
        lower: f64,
        upper: f64,
    },

    /// Rank queried for points that are not componentwise ordered.
    #[error("rank query points are not ordered: {a:?} is not <= {b:?}")]
    UnorderedPoints { a: Point, b: Point },

    /// A sampling rectangle with zero extent along an axis.
    #[error("degenerate rectangle: zero extent along axis {axis}")]
    DegenerateRectangle { axis: usize },

    /// Normalization requested for a rectangle it cannot rescale.
    #[error("normalization undefined for rectangle extent dx={dx}, dy={dy}")]
    UndefinedNormalization { dx: f64, dy: f64 },

    #[error("grid size must be at least {min}, got {got}")]
    InvalidGridSize { min: usize, got: usize },

    /// An axis partition violating the ordering invariant.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("matrix shape {actual:?} does not match dimension cells {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("scale factor must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("empty collection: {0}")]
    EmptyCollection(&'static str),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

/// Failures reported by (or while talking to) an external oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The external executable exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    ProcessFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Output that could not be understood.
    #[error("could not parse {context}: {line:?}")]
    Parse { context: &'static str, line: String },

    /// A batched reply with the wrong number of entries.
    #[error("oracle returned {actual} results for {expected} queries")]
    LengthMismatch { expected: usize, actual: usize },

    /// The oracle refused the query (e.g. a malformed rectangle).
    #[error("oracle rejected query: {0}")]
    Rejected(String),
}

impl OracleError {
    pub(crate) fn parse(context: &'static str, line: impl Into<String>) -> Self {
        OracleError::Parse {
            context,
            line: line.into(),
        }
    }
}
