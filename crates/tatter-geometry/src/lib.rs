//! Tatter Geometry - planar polygon helpers for the tear effect
//!
//! - `Polygon` - a validated vertex ring with shoelace area and vertex centroid
//! - `segment_intersection` - parametric segment/segment test
//! - `Polygon::split` - cut a convex polygon along a chord that crosses exactly two edges

mod intersect;
mod polygon;

pub use intersect::{segment_intersection, Crossing};
pub use polygon::{Polygon, MIN_PIECE_AREA};
