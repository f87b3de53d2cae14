//! Runtime configuration: oracle executables and computation parameters.
//!
//! All structs deserialize from JSON with defaults for missing fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DistanceError, Result};
use crate::geometry::Bounds;

/// Settings for the process-backed oracles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Persistence engine executable
    pub rivet_executable: PathBuf,
    /// Bottleneck distance executable
    pub bottleneck_executable: PathBuf,
    /// Finite stand-in for infinite bar ends; the bottleneck tool
    /// misbehaves on `inf`.
    pub infinity_substitute: f64,
    /// Upper limit on any reported bottleneck distance
    pub distance_cap: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            rivet_executable: PathBuf::from("rivet_console"),
            bottleneck_executable: PathBuf::from("bottleneck_dist"),
            infinity_substitute: 1e10,
            distance_cap: 10.0,
        }
    }
}

/// Parameters of [`matching_distance`](crate::matching_distance)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingParams {
    /// Number of slopes, and of offsets per slope
    pub grid_size: usize,
    /// Compute as if the rectangle were rescaled to the unit square
    pub normalize: bool,
    /// Rectangle to sample over; the union of the modules' bounds if unset.
    /// Fixing it gives uniform precision across a collection of modules.
    pub fixed_bounds: Option<Bounds>,
}

impl Default for MatchingParams {
    fn default() -> Self {
        Self {
            grid_size: 20,
            normalize: false,
            fixed_bounds: None,
        }
    }
}

impl MatchingParams {
    pub fn new(grid_size: usize, normalize: bool) -> Self {
        Self {
            grid_size,
            normalize,
            fixed_bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.fixed_bounds = Some(bounds);
        self
    }
}

/// Parameters of [`rank_norm`](crate::rank_norm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankNormParams {
    /// Points per axis of the sampling grid (at least 2)
    pub grid_size: usize,
    pub fixed_bounds: Option<Bounds>,
    /// Weight pairs by the slope of the line through them
    pub use_weights: bool,
    /// Integrate over the rectangle rescaled to the unit square
    pub normalize: bool,
    /// Ranks below this count as zero
    pub minimum_rank: u32,
}

impl Default for RankNormParams {
    fn default() -> Self {
        Self {
            grid_size: 20,
            fixed_bounds: None,
            use_weights: false,
            normalize: false,
            minimum_rank: 0,
        }
    }
}

/// Load an [`OracleConfig`] from a JSON file
pub fn load_config(path: &Path) -> Result<OracleConfig> {
    let data = fs::read_to_string(path).map_err(|e| DistanceError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to read: {e}"),
    })?;
    serde_json::from_str(&data).map_err(|e| DistanceError::Config {
        path: path.to_path_buf(),
        reason: format!("failed to parse: {e}"),
    })
}
