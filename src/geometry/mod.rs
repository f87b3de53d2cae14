//! Geometry Module: Lines and Rectangles of the Parameter Plane
//!
//! A 2-parameter persistence module restricted to a line of positive slope
//! is a 1-parameter module, summarized by a barcode. Everything in this
//! crate that queries a module along lines goes through these types:
//! - `Point`, `Line`: slope/offset description of slices
//! - `Bounds`: the rectangle a module is studied over
//! - `generate_lines`: the deterministic line grid used by the matching distance

mod bounds;
mod line;
mod sampler;

pub use bounds::Bounds;
pub use line::{find_offset, line_parameter, slope_offset, Line, Point};
pub use sampler::{generate_lines, sample_slopes};
