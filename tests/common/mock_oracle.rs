use std::cell::Cell;

use tda_module_distance::{
    line_parameter, Bar, Barcode, BettiGenerator, BottleneckOracle, Bounds, Grades, Line, ModuleOracle,
    MultiBetti, OracleError, Point,
};

/// Direct sum of free modules, one generator per point.
///
/// The slice of a free module at `p` along a line is a single essential bar
/// starting where the line enters the quadrant above `p`.
#[derive(Debug, Clone)]
pub struct FreeModule {
    pub generators: Vec<Point>,
}

impl FreeModule {
    pub fn new(generators: &[(f64, f64)]) -> Self {
        Self {
            generators: generators.iter().map(|&p| Point::from(p)).collect(),
        }
    }

    pub fn shifted(&self, dx: f64, dy: f64) -> Self {
        Self {
            generators: self.generators.iter().map(|p| Point::new(p.x + dx, p.y + dy)).collect(),
        }
    }
}

/// First point of `line` in the quadrant above `p`
fn entry_point(line: &Line, p: Point) -> Option<Point> {
    if line.is_vertical() {
        let x = -line.offset;
        return (x >= p.x).then_some(Point::new(x, p.y));
    }
    if line.is_horizontal() {
        let y = line.offset;
        return (y >= p.y).then_some(Point::new(p.x, y));
    }
    let m = line.gradient();
    let b = line.offset / line.slope.to_radians().cos();
    let y_at = m * p.x + b;
    if y_at >= p.y {
        Some(Point::new(p.x, y_at))
    } else {
        Some(Point::new((p.y - b) / m, p.y))
    }
}

/// In-memory module oracle over [`FreeModule`]s, counting its calls
pub struct FreeModuleOracle {
    /// Rectangle reported for every module
    pub bounds: Bounds,
    /// Upper grade added to every axis of the Betti grades
    pub grade_limit: f64,
    pub barcode_calls: Cell<usize>,
    pub lines_queried: Cell<usize>,
}

impl FreeModuleOracle {
    pub fn new(lower: (f64, f64), upper: (f64, f64)) -> Self {
        Self {
            bounds: Bounds::new(lower.into(), upper.into()).unwrap(),
            grade_limit: upper.0.max(upper.1),
            barcode_calls: Cell::new(0),
            lines_queried: Cell::new(0),
        }
    }
}

impl ModuleOracle for FreeModuleOracle {
    type Module = FreeModule;

    fn barcodes(&self, module: &FreeModule, lines: &[Line]) -> Result<Vec<Barcode>, OracleError> {
        self.barcode_calls.set(self.barcode_calls.get() + 1);
        self.lines_queried.set(self.lines_queried.get() + lines.len());
        Ok(lines
            .iter()
            .map(|line| {
                module
                    .generators
                    .iter()
                    .filter_map(|&p| entry_point(line, p))
                    .map(|q| Bar::new(line_parameter(line, q), f64::INFINITY, 1))
                    .collect()
            })
            .collect())
    }

    fn bounds(&self, _: &FreeModule) -> Result<Bounds, OracleError> {
        Ok(self.bounds)
    }

    fn multi_betti(&self, module: &FreeModule) -> Result<MultiBetti, OracleError> {
        let grades_of = |coord: fn(&Point) -> f64| {
            let mut g: Vec<f64> = module.generators.iter().map(coord).collect();
            g.push(self.grade_limit);
            g.sort_by(f64::total_cmp);
            g.dedup();
            g
        };
        let x = grades_of(|p| p.x);
        let y = grades_of(|p| p.y);
        let index = |grades: &[f64], v: f64| grades.iter().position(|&g| g == v).unwrap();
        let xi_0 = module
            .generators
            .iter()
            .map(|p| BettiGenerator::new(index(&x, p.x), index(&y, p.y), 1))
            .collect();
        Ok(MultiBetti::new(Grades { x, y }, xi_0, vec![], vec![]))
    }
}

/// Bottleneck distance by matching bars in sorted order.
///
/// Exact when both barcodes hold only essential bars; an upper bound
/// otherwise. Symmetric and zero on equal barcodes.
#[derive(Default)]
pub struct SortedBottleneck {
    pub batch_calls: Cell<usize>,
}

impl SortedBottleneck {
    fn sorted(code: &Barcode) -> (Vec<f64>, Vec<Bar>) {
        let bars = code.expand().bars;
        let mut essential: Vec<f64> = bars.iter().filter(|b| b.is_essential()).map(|b| b.start).collect();
        let mut finite: Vec<Bar> = bars.into_iter().filter(|b| !b.is_essential()).collect();
        essential.sort_by(f64::total_cmp);
        finite.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));
        (essential, finite)
    }
}

impl BottleneckOracle for SortedBottleneck {
    fn distance(&self, left: &Barcode, right: &Barcode) -> Result<f64, OracleError> {
        let (le, lf) = Self::sorted(left);
        let (re, rf) = Self::sorted(right);
        if le.len() != re.len() {
            return Ok(f64::INFINITY);
        }
        let mut d = le.iter().zip(&re).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max);
        for (a, b) in lf.iter().zip(&rf) {
            d = d.max((a.start - b.start).abs()).max((a.end - b.end).abs());
        }
        let unmatched = if lf.len() > rf.len() { &lf[rf.len()..] } else { &rf[lf.len()..] };
        for bar in unmatched {
            d = d.max(bar.persistence() / 2.0);
        }
        Ok(d)
    }

    fn multi_distance(&self, lefts: &[Barcode], rights: &[Barcode]) -> Result<Vec<f64>, OracleError> {
        self.batch_calls.set(self.batch_calls.get() + 1);
        if lefts.len() != rights.len() {
            return Err(OracleError::LengthMismatch {
                expected: lefts.len(),
                actual: rights.len(),
            });
        }
        lefts.iter().zip(rights).map(|(l, r)| self.distance(l, r)).collect()
    }
}
