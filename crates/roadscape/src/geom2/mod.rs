//! Planar geometry primitives for world generation.
//!
//! Purpose
//! - Segment intersection, projection and point-to-segment distance.
//! - Closed polygons with ray-cast containment and boundary distances.
//! - Boundary union of a polygon layer (break + keep uncovered edges).
//!
//! Conventions
//! - Positions are `nalgebra::Vector2<f64>`; equality is exact.
//! - Parallel or collinear pairs never intersect (`EPSILON` on the determinant).
//! - Degenerate input degrades to "no intersection" / "not contained".
//!
//! Code cross-refs: `Segment`, `Polygon`, `union`, `crate::envelope::Envelope`

pub mod polygon;
mod types;
pub mod union;
mod util;

pub use polygon::{Polygon, OUTER_POINT};
pub use types::{intersect, Element, Intersection, Projection, Segment, EPSILON, SPLIT_EPSILON};
pub use union::{break_pair, multi_break, union};
pub use util::{fake_3d_point, heading, lerp, lerp_vec, midpoint, perp, translate};
