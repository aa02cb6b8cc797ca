//! World regeneration pipeline.
//!
//! Purpose
//! - Own the road graph and every piece of derived geometry: road envelopes,
//!   merged road borders, buildings and trees.
//! - Detect graph edits on `update` and rebuild everything from scratch.
//!
//! Change detection
//! - Fast path: the graph's revision counter. If it moved, the geometry hash
//!   decides; edits that restore the previous geometry do not regenerate.
//!
//! Determinism
//! - `regenerate` seeds a fresh `StdRng` from `WorldCfg::seed`, so the same
//!   graph and config always produce the same world. `regenerate_with`
//!   accepts any RNG.
//!
//! Concurrency
//! - Edits go through `graph_mut(&mut self)`; the borrow rules keep edits and
//!   regeneration from interleaving. Callers sharing a world across threads
//!   wrap the whole `World` in one lock.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::building::{self, Building};
use crate::config::WorldCfg;
use crate::envelope::Envelope;
use crate::error::WorldError;
use crate::geom2::{union, Polygon, Segment};
use crate::graph::Graph;
use crate::time::TimeStep;
use crate::tree::{self, ScatterReport, Tree};

/// Drawable item in painter's order.
#[derive(Clone, Copy, Debug)]
pub enum Item<'a> {
    Building(&'a Building),
    Tree(&'a Tree),
}

impl Item<'_> {
    #[inline]
    pub fn distance_to(&self, p: Vector2<f64>) -> f64 {
        match self {
            Item::Building(b) => b.distance_to(p),
            Item::Tree(t) => t.distance_to(p),
        }
    }
}

#[derive(Clone, Debug)]
pub struct World {
    cfg: WorldCfg,
    graph: Graph,
    envelopes: Vec<Envelope>,
    road_borders: Vec<Segment>,
    buildings: Vec<Building>,
    trees: Vec<Tree>,
    scatter: ScatterReport,
    graph_hash: u64,
    seen_revision: u64,
    view_point: Vector2<f64>,
    generation: u64,
}

impl World {
    /// Validate `cfg` and generate the initial world.
    pub fn new(graph: Graph, cfg: WorldCfg) -> Result<Self, WorldError> {
        cfg.validate()?;
        let mut world = Self {
            cfg,
            graph_hash: graph.content_hash(),
            seen_revision: graph.revision(),
            graph,
            envelopes: Vec::new(),
            road_borders: Vec::new(),
            buildings: Vec::new(),
            trees: Vec::new(),
            scatter: ScatterReport::default(),
            view_point: Vector2::zeros(),
            generation: 0,
        };
        world.regenerate();
        Ok(world)
    }

    #[inline]
    pub fn cfg(&self) -> &WorldCfg {
        &self.cfg
    }

    /// Swap parameters and regenerate.
    pub fn set_cfg(&mut self, cfg: WorldCfg) -> Result<(), WorldError> {
        cfg.validate()?;
        self.cfg = cfg;
        self.regenerate();
        Ok(())
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable graph access for editors; changes are picked up by `update`.
    #[inline]
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    /// Per-tick hook: regenerate when the graph geometry changed.
    ///
    /// Returns `true` if the world was rebuilt.
    pub fn update(&mut self, step: &TimeStep) -> bool {
        let revision = self.graph.revision();
        if revision == self.seen_revision {
            return false;
        }
        self.seen_revision = revision;
        let hash = self.graph.content_hash();
        if hash == self.graph_hash {
            tracing::trace!(revision, "graph edited without geometry change");
            return false;
        }
        self.graph_hash = hash;
        tracing::debug!(revision, step_ms = step.millis(), "graph changed");
        self.regenerate();
        true
    }

    /// Rebuild everything with the configured seed.
    pub fn regenerate(&mut self) {
        let mut rng = StdRng::seed_from_u64(self.cfg.seed);
        self.regenerate_with(&mut rng);
    }

    /// Rebuild everything drawing randomness from `rng`.
    pub fn regenerate_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let cfg = self.cfg;
        let roads = self.graph.segments();

        self.envelopes = roads
            .iter()
            .map(|s| Envelope::new(*s, cfg.roads.width, cfg.roads.roundness))
            .collect();
        let road_polys: Vec<Polygon> = self.envelopes.iter().map(|e| e.polygon().clone()).collect();
        self.road_borders = union(&road_polys);

        let bases = building::footprints(&roads, &cfg.roads, &cfg.buildings, rng);

        let mut anchors: Vec<Vector2<f64>> = self
            .road_borders
            .iter()
            .flat_map(|s| [s.from, s.to])
            .collect();
        anchors.extend(bases.iter().flat_map(|b| b.points().iter().copied()));
        let mut illegal = bases.clone();
        illegal.extend(road_polys);

        let (trees, report) = tree::scatter(&anchors, &illegal, &cfg.trees, self.view_point, rng);
        self.buildings = bases
            .into_iter()
            .map(|b| Building::new(b, cfg.buildings.height, self.view_point))
            .collect();
        self.trees = trees;
        self.scatter = report;
        self.generation += 1;

        tracing::info!(
            generation = self.generation,
            roads = roads.len(),
            borders = self.road_borders.len(),
            buildings = self.buildings.len(),
            trees = self.trees.len(),
            "world regenerated"
        );
    }

    /// Move the viewer; roofs and canopies lean away from it.
    pub fn set_view_point(&mut self, view_point: Vector2<f64>) {
        self.view_point = view_point;
        for b in &mut self.buildings {
            b.update(view_point);
        }
        for t in &mut self.trees {
            t.update(view_point);
        }
    }

    #[inline]
    pub fn view_point(&self) -> Vector2<f64> {
        self.view_point
    }

    #[inline]
    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    #[inline]
    pub fn road_borders(&self) -> &[Segment] {
        &self.road_borders
    }

    #[inline]
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    #[inline]
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    #[inline]
    pub fn scatter_report(&self) -> ScatterReport {
        self.scatter
    }

    /// Number of regenerations so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Buildings and trees, farthest from the viewpoint first.
    pub fn items_back_to_front(&self) -> Vec<Item<'_>> {
        let vp = self.view_point;
        let mut items: Vec<(f64, Item<'_>)> = self
            .buildings
            .iter()
            .map(Item::Building)
            .chain(self.trees.iter().map(Item::Tree))
            .map(|it| (it.distance_to(vp), it))
            .collect();
        items.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        items.into_iter().map(|(_, it)| it).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildingCfg, RoadCfg, TreeCfg};
    use crate::geom2::EPSILON;
    use nalgebra::vector;

    fn loop_graph(side: f64) -> Graph {
        let mut g = Graph::new();
        let c = [
            vector![0.0, 0.0],
            vector![side, 0.0],
            vector![side, side],
            vector![0.0, side],
        ];
        for p in c {
            g.try_add_point(p);
        }
        for k in 0..4 {
            g.try_add_segment(c[k], c[(k + 1) % 4]);
        }
        g
    }

    fn small_cfg() -> WorldCfg {
        WorldCfg {
            roads: RoadCfg {
                width: 40.0,
                roundness: 6,
            },
            buildings: BuildingCfg {
                width: 60.0,
                min_length: 60.0,
                spacing: 20.0,
                min_offset: -4.0,
                max_offset: 4.0,
                height: 40.0,
            },
            trees: TreeCfg {
                density: 40.0,
                min_radius: 15.0,
                max_radius: 25.0,
                height: 60.0,
                levels: 4,
                max_attempts: 20_000,
            },
            seed: 42,
        }
    }

    fn fingerprint(w: &World) -> (Vec<Polygon>, Vec<Segment>, Vec<Polygon>, Vec<Vec<Polygon>>) {
        (
            w.envelopes().iter().map(|e| e.polygon().clone()).collect(),
            w.road_borders().to_vec(),
            w.buildings().iter().map(|b| b.base().clone()).collect(),
            w.trees().iter().map(|t| t.levels().to_vec()).collect(),
        )
    }

    /// Vertex degrees and ring count of a border, vertices merged within `EPSILON`.
    fn border_topology(borders: &[Segment]) -> (Vec<usize>, usize) {
        let mut verts: Vec<Vector2<f64>> = Vec::new();
        let mut slot = |p: Vector2<f64>| match verts.iter().position(|v| (v - p).norm() <= EPSILON) {
            Some(i) => i,
            None => {
                verts.push(p);
                verts.len() - 1
            }
        };
        let ends: Vec<(usize, usize)> = borders.iter().map(|s| (slot(s.from), slot(s.to))).collect();
        let n = verts.len();
        let mut degree = vec![0usize; n];
        let mut parent: Vec<usize> = (0..n).collect();
        fn root(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }
        for &(a, b) in &ends {
            degree[a] += 1;
            degree[b] += 1;
            let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
            parent[ra] = rb;
        }
        let rings = (0..n).filter(|&i| root(&mut parent, i) == i).count();
        (degree, rings)
    }

    #[test]
    fn loop_borders_form_two_closed_rings() {
        for roundness in [6, 7, 10] {
            let mut cfg = WorldCfg::default();
            cfg.roads.roundness = roundness;
            cfg.trees.density = 0.0;
            let w = World::new(loop_graph(600.0), cfg).unwrap();
            let borders = w.road_borders();
            assert!(!borders.is_empty());

            let (degree, rings) = border_topology(borders);
            assert!(
                degree.iter().all(|&d| d == 2),
                "roundness {roundness}: open border {degree:?}"
            );
            // outer boundary plus the hole inside the loop
            assert_eq!(rings, 2, "roundness {roundness}");
            for (i, a) in borders.iter().enumerate() {
                assert!(
                    borders[i + 1..].iter().all(|b| !a.approx_eq(b, EPSILON)),
                    "roundness {roundness}: duplicate edge {a:?}"
                );
            }

            let radius = cfg.roads.width * 0.5;
            let roads = w.graph().segments();
            for seg in borders {
                let m = seg.midpoint();
                let nearest = roads
                    .iter()
                    .map(|r| r.distance_to(m))
                    .fold(f64::INFINITY, f64::min);
                // chord midpoints sit slightly inside their arc
                assert!(nearest > radius - 2.0, "interior edge at {m:?}");
            }
        }
    }

    #[test]
    fn far_parallel_roads_keep_their_outlines() {
        let mut g = Graph::new();
        let pts = [
            vector![0.0, 0.0],
            vector![500.0, 0.0],
            vector![0.0, 300.0],
            vector![500.0, 300.0],
        ];
        for p in pts {
            g.try_add_point(p);
        }
        g.try_add_segment(pts[0], pts[1]);
        g.try_add_segment(pts[2], pts[3]);
        let w = World::new(g, small_cfg()).unwrap();
        let mut expected = w.envelopes()[0].polygon().segments();
        expected.extend(w.envelopes()[1].polygon().segments());
        assert_eq!(w.road_borders(), expected.as_slice());
    }

    #[test]
    fn zero_density_means_no_trees() {
        let mut cfg = small_cfg();
        cfg.trees.density = 0.0;
        let w = World::new(loop_graph(400.0), cfg).unwrap();
        assert!(w.trees().is_empty());
        assert_eq!(w.scatter_report().requested, 0);
    }

    #[test]
    fn regeneration_is_reproducible() {
        let mut w = World::new(loop_graph(400.0), small_cfg()).unwrap();
        let first = fingerprint(&w);
        assert!(!first.2.is_empty());
        w.regenerate();
        assert_eq!(fingerprint(&w), first);
        let other = World::new(loop_graph(400.0), small_cfg()).unwrap();
        assert_eq!(fingerprint(&other), first);
    }

    #[test]
    fn buildings_are_separated() {
        let cfg = small_cfg();
        let w = World::new(loop_graph(400.0), cfg).unwrap();
        let b = w.buildings();
        for i in 0..b.len() {
            for j in (i + 1)..b.len() {
                assert!(!b[i].base().intersects(b[j].base()));
                assert!(
                    b[i].base().distance_to_polygon(b[j].base())
                        >= cfg.buildings.spacing - EPSILON
                );
            }
        }
    }

    #[test]
    fn update_regenerates_only_on_geometry_change() {
        let mut w = World::new(loop_graph(400.0), small_cfg()).unwrap();
        let step = TimeStep::new(0.0);
        assert_eq!(w.generation(), 1);
        assert!(!w.update(&step));

        // edit and revert: revision moves, geometry does not
        assert!(w.graph_mut().move_point(0, vector![-10.0, 0.0]));
        assert!(w.graph_mut().move_point(0, vector![0.0, 0.0]));
        assert!(!w.update(&step));
        assert_eq!(w.generation(), 1);

        assert!(w.graph_mut().try_add_point(vector![200.0, 200.0]));
        assert!(w
            .graph_mut()
            .try_add_segment(vector![0.0, 0.0], vector![200.0, 200.0]));
        assert!(w.update(&step));
        assert_eq!(w.generation(), 2);
        assert_eq!(w.envelopes().len(), 5);
        assert!(!w.update(&step));
    }

    #[test]
    fn painter_order_is_far_to_near() {
        let mut w = World::new(loop_graph(400.0), small_cfg()).unwrap();
        w.set_view_point(vector![200.0, -300.0]);
        let vp = w.view_point();
        let items = w.items_back_to_front();
        assert_eq!(items.len(), w.buildings().len() + w.trees().len());
        for pair in items.windows(2) {
            assert!(pair[0].distance_to(vp) >= pair[1].distance_to(vp));
        }
    }

    #[test]
    fn empty_graph_is_an_empty_world() {
        let w = World::new(Graph::new(), WorldCfg::default()).unwrap();
        assert!(w.envelopes().is_empty());
        assert!(w.road_borders().is_empty());
        assert!(w.buildings().is_empty());
        assert!(w.trees().is_empty());
    }

    #[test]
    fn invalid_cfg_is_rejected() {
        let mut cfg = small_cfg();
        cfg.roads.width = -1.0;
        assert!(World::new(Graph::new(), cfg).is_err());
        let mut w = World::new(Graph::new(), small_cfg()).unwrap();
        assert!(w.set_cfg(cfg).is_err());
        assert_eq!(w.cfg().roads.width, 40.0);
    }
}
