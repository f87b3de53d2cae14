//! Process-backed bottleneck distance using the `bottleneck_dist` executable
//!
//! The tool reads two diagrams, one `birth death` pair per line, and prints
//! a single number. It is unreliable on infinite deaths and on empty input,
//! so this wrapper:
//! - replaces infinite ends by a large finite substitute
//! - answers queries with an empty side itself
//! - caps every reported distance

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use super::traits::BottleneckOracle;
use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::topology::Barcode;

/// Bottleneck oracle driving `bottleneck_dist`
#[derive(Debug, Clone)]
pub struct HeraBottleneck {
    executable: PathBuf,
    infinity_substitute: f64,
    cap: f64,
}

impl HeraBottleneck {
    pub fn new(executable: impl Into<PathBuf>, infinity_substitute: f64, cap: f64) -> Self {
        Self {
            executable: executable.into(),
            infinity_substitute,
            cap,
        }
    }

    pub fn from_config(config: &OracleConfig) -> Self {
        Self::new(
            config.bottleneck_executable.clone(),
            config.infinity_substitute,
            config.distance_cap,
        )
    }

    fn finite_end(&self, end: f64) -> f64 {
        end.min(self.infinity_substitute)
    }

    fn capped(&self, dist: f64) -> f64 {
        if dist > self.cap {
            warn!("bottleneck distance {} capped at {}", dist, self.cap);
            self.cap
        } else {
            dist
        }
    }

    /// Diagram file body, one line per interval counted with multiplicity
    fn diagram_text(&self, code: &Barcode) -> String {
        let mut out = String::new();
        for bar in &code.bars {
            for _ in 0..bar.multiplicity {
                let _ = writeln!(out, "{} {}", bar.start, self.finite_end(bar.end));
            }
        }
        out
    }

    /// Distance to the empty diagram: every interval matched to the diagonal
    fn distance_to_empty(&self, code: &Barcode) -> f64 {
        code.bars
            .iter()
            .filter(|b| b.multiplicity > 0)
            .map(|b| (self.finite_end(b.end) - b.start) / 2.0)
            .fold(0.0, f64::max)
    }

    fn run(&self, left: &Path, right: &Path) -> Result<f64, OracleError> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(left).arg(right);
        debug!("running {:?}", cmd);

        let out = cmd.output()?;
        if !out.status.success() {
            return Err(OracleError::ProcessFailed {
                program: self.executable.display().to_string(),
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }
        let stdout = String::from_utf8_lossy(&out.stdout);
        stdout
            .trim()
            .parse()
            .map_err(|_| OracleError::parse("bottleneck distance", stdout.trim()))
    }
}

impl BottleneckOracle for HeraBottleneck {
    fn distance(&self, left: &Barcode, right: &Barcode) -> Result<f64, OracleError> {
        let left_empty = left.total_multiplicity() == 0;
        let right_empty = right.total_multiplicity() == 0;
        let dist = match (left_empty, right_empty) {
            (true, true) => 0.0,
            (true, false) => self.distance_to_empty(right),
            (false, true) => self.distance_to_empty(left),
            (false, false) => {
                let dir = tempfile::tempdir()?;
                let left_path = dir.path().join("left.txt");
                let right_path = dir.path().join("right.txt");
                fs::write(&left_path, self.diagram_text(left))?;
                fs::write(&right_path, self.diagram_text(right))?;
                self.run(&left_path, &right_path)?
            }
        };
        Ok(self.capped(dist))
    }
}
