//! Generation parameters.
//!
//! - `RoadCfg`: road envelope width and arc subdivision.
//! - `BuildingCfg`: footprint width, spacing, street-front jitter, roof height.
//! - `TreeCfg`: scatter density, canopy radius range, retry cap.
//! - `WorldCfg`: all of the above plus the RNG seed.
//!
//! Every field has a default, so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};

use crate::envelope::DEFAULT_ROUNDNESS;
use crate::error::WorldError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadCfg {
    pub width: f64,
    pub roundness: u32,
}

impl Default for RoadCfg {
    fn default() -> Self {
        Self {
            width: 100.0,
            roundness: DEFAULT_ROUNDNESS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingCfg {
    pub width: f64,
    /// Shortest guide that still receives buildings; also the shortest support.
    pub min_length: f64,
    /// Gap between neighbouring footprints and between footprints and roads.
    pub spacing: f64,
    /// Perpendicular jitter range for each support.
    pub min_offset: f64,
    pub max_offset: f64,
    /// Roof lift used for the pseudo-3D ceiling.
    pub height: f64,
}

impl Default for BuildingCfg {
    fn default() -> Self {
        Self {
            width: 150.0,
            min_length: 150.0,
            spacing: 50.0,
            min_offset: 0.0,
            max_offset: 0.0,
            height: 100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeCfg {
    /// Trees per 1 000 000 square units of the scatter box.
    pub density: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub height: f64,
    pub levels: usize,
    /// Upper bound on rejection-sampling draws per scatter.
    pub max_attempts: usize,
}

impl Default for TreeCfg {
    fn default() -> Self {
        Self {
            density: 3.0,
            min_radius: 50.0,
            max_radius: 80.0,
            height: 200.0,
            levels: 7,
            max_attempts: 100_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldCfg {
    pub roads: RoadCfg,
    pub buildings: BuildingCfg,
    pub trees: TreeCfg,
    pub seed: u64,
}

impl Default for WorldCfg {
    fn default() -> Self {
        Self {
            roads: RoadCfg::default(),
            buildings: BuildingCfg::default(),
            trees: TreeCfg::default(),
            seed: 0x5eed,
        }
    }
}

impl WorldCfg {
    pub fn from_json(s: &str) -> Result<Self, WorldError> {
        let cfg: WorldCfg = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject parameter sets the generators cannot honour.
    pub fn validate(&self) -> Result<(), WorldError> {
        let r = &self.roads;
        let b = &self.buildings;
        let t = &self.trees;
        if !(r.width >= 0.0) {
            return Err(WorldError::invalid("roads.width must be >= 0"));
        }
        if r.roundness == 0 {
            return Err(WorldError::invalid("roads.roundness must be >= 1"));
        }
        if !(b.width >= 0.0) || !(b.spacing >= 0.0) || !(b.min_length >= 0.0) {
            return Err(WorldError::invalid(
                "buildings.width, spacing and min_length must be >= 0",
            ));
        }
        if !(b.min_length + b.spacing > 0.0) {
            return Err(WorldError::invalid(
                "buildings.min_length + spacing must be > 0",
            ));
        }
        if !(b.min_offset <= b.max_offset) {
            return Err(WorldError::invalid(
                "buildings.min_offset must not exceed max_offset",
            ));
        }
        if !(t.density >= 0.0) {
            return Err(WorldError::invalid("trees.density must be >= 0"));
        }
        if !(t.min_radius >= 0.0 && t.min_radius <= t.max_radius) {
            return Err(WorldError::invalid(
                "trees radius range must satisfy 0 <= min_radius <= max_radius",
            ));
        }
        if t.levels < 2 {
            return Err(WorldError::invalid("trees.levels must be >= 2"));
        }
        if t.max_attempts == 0 {
            return Err(WorldError::invalid("trees.max_attempts must be >= 1"));
        }
        Ok(())
    }
}
