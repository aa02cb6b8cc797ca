//! Curated internal API (UNSTABLE).
//!
//! A convenience surface for the CLI and benches. Breaking changes are
//! allowed and expected.

// Geometry
pub use crate::geom2::{
    break_pair, fake_3d_point, intersect, multi_break, union, Element, Intersection, Polygon,
    Projection, Segment, EPSILON, SPLIT_EPSILON,
};
// Generators
pub use crate::building::{footprints, guides, prune, supports, Building};
pub use crate::envelope::{Envelope, DEFAULT_ROUNDNESS};
pub use crate::tree::{scatter, scatter_bounds, ScatterReport, Tree};
// Graph and world
pub use crate::config::{BuildingCfg, RoadCfg, TreeCfg, WorldCfg};
pub use crate::graph::{Edge, Graph, GraphDoc, Point, SegmentDoc, XY};
pub use crate::style::{PointStyle, Style};
pub use crate::time::TimeStep;
pub use crate::world::{Item, World};

use nalgebra::Vector2;

/// Regular grid of `rows × cols` points joined to their right and lower neighbours.
pub fn grid_graph(rows: usize, cols: usize, spacing: f64) -> Graph {
    let mut g = Graph::new();
    let at = |r: usize, c: usize| Vector2::new(c as f64 * spacing, r as f64 * spacing);
    for r in 0..rows {
        for c in 0..cols {
            g.try_add_point(at(r, c));
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                g.try_add_segment(at(r, c), at(r, c + 1));
            }
            if r + 1 < rows {
                g.try_add_segment(at(r, c), at(r + 1, c));
            }
        }
    }
    g
}
