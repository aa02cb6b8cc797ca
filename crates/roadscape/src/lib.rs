//! Procedural world generation from an editable road graph.
//!
//! Pipeline (leaf first)
//! - `graph`: the editable road network (point arena + index-pair segments).
//! - `geom2`: segment intersection, polygons, boundary union.
//! - `envelope`: rounded capsules around segments.
//! - `building`: guides, supports, footprint pruning, pseudo-3D buildings.
//! - `tree`: constrained rejection-sampling tree scatter.
//! - `world`: change detection and total regeneration.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; prefer
//!   the `prelude` or `api` re-exports in callers.

pub mod api;
pub mod building;
pub mod config;
pub mod envelope;
pub mod error;
pub mod geom2;
pub mod graph;
pub mod style;
pub mod time;
pub mod tree;
pub mod world;

pub use nalgebra::Vector2 as Vec2;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::building::Building;
    pub use crate::config::{BuildingCfg, RoadCfg, TreeCfg, WorldCfg};
    pub use crate::envelope::Envelope;
    pub use crate::error::WorldError;
    pub use crate::geom2::{intersect, union, Element, Polygon, Segment};
    pub use crate::graph::{Graph, GraphDoc};
    pub use crate::time::TimeStep;
    pub use crate::tree::{ScatterReport, Tree};
    pub use crate::world::{Item, World};
    pub use nalgebra::Vector2 as Vec2;
}
