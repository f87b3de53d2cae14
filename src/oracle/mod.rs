//! Oracle Module: External Persistence and Bottleneck Engines
//!
//! - `traits`: the `ModuleOracle` / `BottleneckOracle` seams
//! - `rivet`: `rivet_console` adapter and its output parsers
//! - `hera`: `bottleneck_dist` adapter with the empty-diagram and cap rules

mod hera;
mod rivet;
mod traits;

pub use hera::HeraBottleneck;
pub use rivet::{parse_betti, parse_bounds, parse_slices, PrecomputedModule, RivetConsole};
pub use traits::{BottleneckOracle, ModuleOracle};

pub(crate) use traits::expect_len;
