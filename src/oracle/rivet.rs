//! Process-backed module oracle using the `rivet_console` executable
//!
//! Modules are RIVET "precomputed" files held in memory as bytes. Every
//! query writes the bytes (and, for barcodes, the list of slices) to a
//! temporary directory, runs the executable once, and parses its stdout.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::traits::{expect_len, ModuleOracle};
use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::geometry::{Bounds, Line, Point};
use crate::topology::{Bar, Barcode, BettiGenerator, Grades, MultiBetti};

/// A module in RIVET's precomputed binary format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecomputedModule(pub Vec<u8>);

impl PrecomputedModule {
    pub fn from_file(path: &Path) -> Result<Self, OracleError> {
        Ok(Self(fs::read(path)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Module oracle driving `rivet_console`
#[derive(Debug, Clone)]
pub struct RivetConsole {
    executable: PathBuf,
}

impl RivetConsole {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn from_config(config: &OracleConfig) -> Self {
        Self::new(config.rivet_executable.clone())
    }

    /// Compute a module from an input file (point cloud or bifiltration)
    /// for homology degree `homology`, with `x_bins` × `y_bins` coarsening
    /// (0 = no coarsening).
    pub fn compute_file(
        &self,
        input: &Path,
        homology: u32,
        x_bins: u32,
        y_bins: u32,
    ) -> Result<PrecomputedModule, OracleError> {
        let dir = tempfile::tempdir()?;
        let output = dir
            .path()
            .join(format!("module.H{homology}_x{x_bins}_y{y_bins}.rivet"));
        let (homology, x_bins, y_bins) = (homology.to_string(), x_bins.to_string(), y_bins.to_string());
        let args: [&OsStr; 8] = [
            input.as_os_str(),
            output.as_os_str(),
            OsStr::new("-H"),
            OsStr::new(&homology),
            OsStr::new("-x"),
            OsStr::new(&x_bins),
            OsStr::new("-y"),
            OsStr::new(&y_bins),
        ];
        self.run(&args)?;
        PrecomputedModule::from_file(&output)
    }

    fn run<S: AsRef<OsStr>>(&self, args: &[S]) -> Result<String, OracleError> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(args);
        debug!("running {:?}", cmd);

        let out = cmd.output()?;
        if !out.status.success() {
            return Err(OracleError::ProcessFailed {
                program: self.executable.display().to_string(),
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    /// Run a query with the module written to `dir/precomputed.rivet`
    fn query(&self, module: &PrecomputedModule, dir: &Path, flags: &[&str]) -> Result<String, OracleError> {
        let path = dir.join("precomputed.rivet");
        fs::write(&path, module.as_bytes())?;
        let mut args: Vec<&OsStr> = vec![path.as_os_str()];
        args.extend(flags.iter().map(|f| OsStr::new(*f)));
        self.run(&args)
    }
}

impl ModuleOracle for RivetConsole {
    type Module = PrecomputedModule;

    fn barcodes(&self, module: &PrecomputedModule, lines: &[Line]) -> Result<Vec<Barcode>, OracleError> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }
        let dir = tempfile::tempdir()?;
        let slices = dir.path().join("slices.txt");
        let body: String = lines
            .iter()
            .map(|l| format!("{} {}\n", l.slope, l.offset))
            .collect();
        fs::write(&slices, body)?;

        let slices_arg = slices.display().to_string();
        let stdout = self.query(module, dir.path(), &["--barcodes", &slices_arg])?;
        let codes = parse_slices(&stdout)?
            .into_iter()
            .map(|(_, code)| code)
            .collect();
        expect_len(codes, lines.len())
    }

    fn bounds(&self, module: &PrecomputedModule) -> Result<Bounds, OracleError> {
        let dir = tempfile::tempdir()?;
        let stdout = self.query(module, dir.path(), &["--bounds"])?;
        parse_bounds(&stdout)
    }

    fn multi_betti(&self, module: &PrecomputedModule) -> Result<MultiBetti, OracleError> {
        let dir = tempfile::tempdir()?;
        let stdout = self.query(module, dir.path(), &["--betti"])?;
        parse_betti(&stdout)
    }
}

fn parse_pair(text: &str, context: &'static str) -> Result<Point, OracleError> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x, y] => {
            let x = x.parse().map_err(|_| OracleError::parse(context, text))?;
            let y = y.parse().map_err(|_| OracleError::parse(context, text))?;
            Ok(Point::new(x, y))
        }
        _ => Err(OracleError::parse(context, text)),
    }
}

/// Parse the `--bounds` report (`low: x, y` and `high: x, y` lines)
pub fn parse_bounds(text: &str) -> Result<Bounds, OracleError> {
    let mut low = Point::new(0.0, 0.0);
    let mut high = Point::new(0.0, 0.0);
    for line in text.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix("low:") {
            low = parse_pair(rest, "bounds")?;
        } else if let Some(rest) = line.strip_prefix("high:") {
            high = parse_pair(rest, "bounds")?;
        }
    }
    Bounds::new(low, high).map_err(|e| OracleError::Rejected(e.to_string()))
}

/// Parse the `--barcodes` report: one `angle offset: b d xm, ...` line per slice
pub fn parse_slices(text: &str) -> Result<Vec<(Line, Barcode)>, OracleError> {
    let mut slices = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (header, body) = line
            .split_once(':')
            .ok_or_else(|| OracleError::parse("slice header", line))?;
        let mut head = header.split_whitespace();
        let (angle, offset) = match (head.next(), head.next(), head.next()) {
            (Some(a), Some(o), None) => (
                a.parse::<f64>().map_err(|_| OracleError::parse("slice angle", line))?,
                o.parse::<f64>().map_err(|_| OracleError::parse("slice offset", line))?,
            ),
            _ => return Err(OracleError::parse("slice header", line)),
        };

        let mut bars = Vec::new();
        for part in body.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let fields: Vec<&str> = part.split_whitespace().collect();
            let bar = match fields.as_slice() {
                [birth, death, mult] => {
                    let birth = birth.parse().map_err(|_| OracleError::parse("bar", part))?;
                    let death = death.parse().map_err(|_| OracleError::parse("bar", part))?;
                    let mult = mult
                        .strip_prefix('x')
                        .and_then(|m| m.parse().ok())
                        .ok_or_else(|| OracleError::parse("bar multiplicity", part))?;
                    Bar::new(birth, death, mult)
                }
                _ => return Err(OracleError::parse("bar", part)),
            };
            bars.push(bar);
        }
        slices.push((Line::new(angle, offset), Barcode::new(bars)));
    }
    Ok(slices)
}

/// Grade values may be printed as exact fractions `p/q`
fn parse_grade(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((p, q)) => {
            let p: f64 = p.trim().parse().ok()?;
            let q: f64 = q.trim().parse().ok()?;
            (q != 0.0).then(|| p / q)
        }
        None => text.parse().ok(),
    }
}

enum BettiSection {
    None,
    XGrades,
    YGrades,
    Xi(usize),
}

/// Parse the `--betti` report
///
/// Sections `x-grades` / `y-grades` list one grade per line; `xi_k:`
/// sections list `(x, y, m)` triples. A blank line ends a section.
pub fn parse_betti(text: &str) -> Result<MultiBetti, OracleError> {
    let mut grades = Grades::default();
    let mut xi: [Vec<BettiGenerator>; 3] = Default::default();
    let mut section = BettiSection::None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            section = BettiSection::None;
        } else if line == "x-grades" {
            section = BettiSection::XGrades;
        } else if line == "y-grades" {
            section = BettiSection::YGrades;
        } else if let Some(rest) = line.strip_prefix("xi_") {
            let k = rest
                .chars()
                .next()
                .and_then(|c| c.to_digit(10))
                .filter(|&k| k < 3)
                .ok_or_else(|| OracleError::parse("betti section", line))?;
            section = BettiSection::Xi(k as usize);
        } else {
            match section {
                BettiSection::XGrades => grades
                    .x
                    .push(parse_grade(line).ok_or_else(|| OracleError::parse("x-grade", line))?),
                BettiSection::YGrades => grades
                    .y
                    .push(parse_grade(line).ok_or_else(|| OracleError::parse("y-grade", line))?),
                BettiSection::Xi(k) => xi[k].push(parse_generator(line)?),
                // Preamble lines outside any section
                BettiSection::None => {}
            }
        }
    }

    let [xi_0, xi_1, xi_2] = xi;
    Ok(MultiBetti::new(grades, xi_0, xi_1, xi_2))
}

fn parse_generator(line: &str) -> Result<BettiGenerator, OracleError> {
    let inner = line
        .strip_prefix('(')
        .and_then(|l| l.strip_suffix(')'))
        .ok_or_else(|| OracleError::parse("betti generator", line))?;
    let nums: Vec<u64> = inner
        .split(',')
        .map(|p| p.trim().parse())
        .collect::<Result<_, _>>()
        .map_err(|_| OracleError::parse("betti generator", line))?;
    let [x, y, m] = nums.as_slice() else {
        return Err(OracleError::parse("betti generator", line));
    };
    let bad = || OracleError::parse("betti generator", line);
    Ok(BettiGenerator::new(
        usize::try_from(*x).map_err(|_| bad())?,
        usize::try_from(*y).map_err(|_| bad())?,
        u32::try_from(*m).map_err(|_| bad())?,
    ))
}
