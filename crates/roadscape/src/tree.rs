//! Tree scatter by rejection sampling.
//!
//! Candidates are drawn uniformly in the bounding box of the anchors (road
//! border endpoints and footprint vertices) grown by `max_radius`. A candidate
//! survives when it
//! - is outside every illegal polygon and at least `0.75·size` from each,
//! - keeps `0.5·(size_a + size_b) + 10` from every placed tree,
//! - lies within `2·size` of some illegal polygon (trees hug roads and
//!   buildings; open fields stay empty).
//!
//! The target count is `ceil(density · area / 1e6)`. Sampling stops after
//! `max_attempts` draws; a short scatter is reported, not an error.

use nalgebra::Vector2;
use rand::Rng;

use crate::config::TreeCfg;
use crate::geom2::{fake_3d_point, lerp, lerp_vec, translate, Polygon};
use crate::style::Style;

/// Vertices per canopy level.
const LEVEL_VERTICES: usize = 32;
/// Canopy size at the top level.
const TOP_SIZE: f64 = 10.0;
/// Extra clearance between neighbouring canopies.
const TREE_GAP: f64 = 10.0;

#[derive(Clone, Debug)]
pub struct Tree {
    position: Vector2<f64>,
    size: f64,
    height: f64,
    /// Per level, per vertex canopy radius; drawn once.
    noise: Vec<Vec<f64>>,
    levels: Vec<Polygon>,
}

impl Tree {
    /// Tree of canopy diameter `size` with `levels` stacked canopy rings.
    pub fn new<R: Rng + ?Sized>(
        position: Vector2<f64>,
        size: f64,
        height: f64,
        levels: usize,
        view_point: Vector2<f64>,
        rng: &mut R,
    ) -> Self {
        let levels = levels.max(2);
        let noise = (0..levels)
            .map(|level| {
                let t = level as f64 / (levels - 1) as f64;
                let radius = lerp(size, TOP_SIZE, t) * 0.5;
                (0..LEVEL_VERTICES)
                    .map(|_| radius * lerp(0.6, 1.0, rng.gen::<f64>()))
                    .collect()
            })
            .collect();
        let mut tree = Self {
            position,
            size,
            height,
            noise,
            levels: Vec::new(),
        };
        tree.levels = tree.build_levels(view_point);
        tree
    }

    fn build_levels(&self, view_point: Vector2<f64>) -> Vec<Polygon> {
        let top = fake_3d_point(self.position, view_point, self.height);
        let n = self.noise.len();
        self.noise
            .iter()
            .enumerate()
            .map(|(level, radii)| {
                let t = level as f64 / (n - 1) as f64;
                let center = lerp_vec(self.position, top, t);
                let step = std::f64::consts::TAU / LEVEL_VERTICES as f64;
                Polygon::new(
                    radii
                        .iter()
                        .enumerate()
                        .map(|(i, r)| translate(center, step * i as f64, *r))
                        .collect(),
                )
            })
            .collect()
    }

    /// Lean the canopy away from a new viewpoint; the noise is kept.
    pub fn update(&mut self, view_point: Vector2<f64>) {
        self.levels = self.build_levels(view_point);
    }

    #[inline]
    pub fn position(&self) -> Vector2<f64> {
        self.position
    }

    /// Canopy diameter at ground level.
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Canopy rings, ground level first.
    #[inline]
    pub fn levels(&self) -> &[Polygon] {
        &self.levels
    }

    #[inline]
    pub fn base(&self) -> &Polygon {
        &self.levels[0]
    }

    pub fn level_style(&self, level: usize) -> Style {
        let n = self.levels.len().max(2);
        Style::canopy(level as f64 / (n - 1) as f64)
    }

    /// Painter's key: distance from the ground ring to `p`.
    #[inline]
    pub fn distance_to(&self, p: Vector2<f64>) -> f64 {
        self.base().distance_to_point(p)
    }
}

/// Outcome of one scatter run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScatterReport {
    pub requested: usize,
    pub placed: usize,
    pub attempts: usize,
}

impl ScatterReport {
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.placed >= self.requested
    }
}

/// Scatter box: anchor bounds grown by `margin`; `None` without anchors.
pub fn scatter_bounds(
    anchors: &[Vector2<f64>],
    margin: f64,
) -> Option<(Vector2<f64>, Vector2<f64>)> {
    let first = *anchors.first()?;
    let (lo, hi) = anchors
        .iter()
        .fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
    let m = Vector2::new(margin, margin);
    Some((lo - m, hi + m))
}

fn accepts(p: Vector2<f64>, size: f64, illegal: &[Polygon], placed: &[Tree]) -> bool {
    for poly in illegal {
        if poly.contains_point(p) || poly.distance_to_point(p) < size * 0.75 {
            return false;
        }
    }
    for t in placed {
        if (t.position - p).norm() < 0.5 * (t.size + size) + TREE_GAP {
            return false;
        }
    }
    illegal.iter().any(|poly| poly.distance_to_point(p) < size * 2.0)
}

/// Place trees around `illegal` polygons inside the box spanned by `anchors`.
pub fn scatter<R: Rng + ?Sized>(
    anchors: &[Vector2<f64>],
    illegal: &[Polygon],
    cfg: &TreeCfg,
    view_point: Vector2<f64>,
    rng: &mut R,
) -> (Vec<Tree>, ScatterReport) {
    let mut report = ScatterReport::default();
    let Some((lo, hi)) = scatter_bounds(anchors, cfg.max_radius) else {
        return (Vec::new(), report);
    };
    let area = (hi.x - lo.x) * (hi.y - lo.y);
    let target = cfg.density * area / 1_000_000.0;
    report.requested = if target > 0.0 && target.is_finite() {
        target.ceil() as usize
    } else {
        0
    };

    let mut trees: Vec<Tree> = Vec::with_capacity(report.requested.min(cfg.max_attempts));
    while trees.len() < report.requested && report.attempts < cfg.max_attempts {
        report.attempts += 1;
        let radius = lerp(cfg.min_radius, cfg.max_radius, rng.gen::<f64>());
        let size = radius * 2.0;
        let p = Vector2::new(
            lerp(lo.x, hi.x, rng.gen::<f64>()),
            lerp(hi.y, lo.y, rng.gen::<f64>()),
        );
        if accepts(p, size, illegal, &trees) {
            trees.push(Tree::new(p, size, cfg.height, cfg.levels, view_point, rng));
        }
    }
    report.placed = trees.len();
    if !report.is_complete() {
        tracing::warn!(
            requested = report.requested,
            placed = report.placed,
            attempts = report.attempts,
            "tree scatter hit its attempt cap"
        );
    }
    (trees, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use crate::geom2::Segment;
    use nalgebra::vector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn road() -> Polygon {
        Envelope::new(Segment::new(vector![0.0, 0.0], vector![2000.0, 0.0]), 100.0, 8)
            .into_polygon()
    }

    /// Road outline plus two far anchors so the box has room beside the road.
    fn anchors(poly: &Polygon) -> Vec<Vector2<f64>> {
        let mut pts = poly.points().to_vec();
        pts.push(vector![1000.0, 400.0]);
        pts.push(vector![1000.0, -400.0]);
        pts
    }

    fn tree_cfg() -> TreeCfg {
        TreeCfg {
            density: 20.0,
            min_radius: 20.0,
            max_radius: 30.0,
            height: 50.0,
            levels: 4,
            max_attempts: 50_000,
        }
    }

    #[test]
    fn zero_density_places_nothing() {
        let poly = road();
        let mut cfg = tree_cfg();
        cfg.density = 0.0;
        let mut rng = StdRng::seed_from_u64(5);
        let (trees, report) = scatter(&anchors(&poly), &[poly.clone()], &cfg, Vector2::zeros(), &mut rng);
        assert!(trees.is_empty());
        assert_eq!(report.requested, 0);
        assert_eq!(report.attempts, 0);
    }

    #[test]
    fn no_anchors_places_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let (trees, report) = scatter(&[], &[], &tree_cfg(), Vector2::zeros(), &mut rng);
        assert!(trees.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn placed_trees_respect_constraints() {
        let poly = road();
        let cfg = tree_cfg();
        let mut rng = StdRng::seed_from_u64(11);
        let illegal = [poly.clone()];
        let (trees, report) = scatter(&anchors(&poly), &illegal, &cfg, Vector2::zeros(), &mut rng);
        assert_eq!(report.placed, trees.len());
        assert!(!trees.is_empty());
        for (i, t) in trees.iter().enumerate() {
            let d = poly.distance_to_point(t.position());
            assert!(!poly.contains_point(t.position()));
            assert!(d >= t.size() * 0.75);
            assert!(d < t.size() * 2.0);
            assert!(t.size() >= 40.0 && t.size() <= 60.0);
            for u in &trees[i + 1..] {
                let gap = (t.position() - u.position()).norm();
                assert!(gap >= 0.5 * (t.size() + u.size()) + TREE_GAP);
            }
        }
    }

    #[test]
    fn unsatisfiable_scatter_stops_at_cap() {
        // With no illegal polygons no candidate is ever close to a road.
        let poly = road();
        let mut cfg = tree_cfg();
        cfg.max_attempts = 200;
        let mut rng = StdRng::seed_from_u64(2);
        let (_, report) = scatter(&anchors(&poly), &[], &cfg, Vector2::zeros(), &mut rng);
        assert_eq!(report.attempts, 200);
        assert_eq!(report.placed, 0);
        assert!(!report.is_complete());
    }

    #[test]
    fn tree_levels_shrink_and_keep_noise_on_update() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut t = Tree::new(vector![100.0, 0.0], 60.0, 200.0, 7, Vector2::zeros(), &mut rng);
        assert_eq!(t.levels().len(), 7);
        assert!(t.levels().iter().all(|l| l.len() == LEVEL_VERTICES));
        let (lo0, hi0) = t.levels()[0].bounds().unwrap();
        let (lo6, hi6) = t.levels()[6].bounds().unwrap();
        assert!((hi6 - lo6).norm() < (hi0 - lo0).norm());
        // top ring leans away from the viewpoint at the origin
        assert!(t.levels()[6].centroid().unwrap().x > 100.0);

        let before: Vec<f64> = t.levels()[0]
            .points()
            .iter()
            .map(|p| (p - t.position()).norm())
            .collect();
        t.update(vector![500.0, 0.0]);
        assert!(t.levels()[6].centroid().unwrap().x < 100.0);
        for (p, r) in t.levels()[0].points().iter().zip(before) {
            assert!(((p - t.position()).norm() - r).abs() < 1e-9);
        }
        assert_ne!(t.level_style(0), t.level_style(6));
    }

    #[test]
    fn huge_scatter_box_is_bounded_by_attempts() {
        let anchors = [
            vector![-1e7, -1e7],
            vector![1e7, -1e7],
            vector![1e7, 1e7],
            vector![-1e7, 1e7],
        ];
        let poly = road();
        let cfg = TreeCfg {
            max_attempts: 10,
            ..TreeCfg::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let (trees, report) = scatter(&anchors, &[poly], &cfg, Vector2::zeros(), &mut rng);
        assert!(report.requested > 1_000_000_000);
        assert_eq!(report.attempts, 10);
        assert!(trees.len() <= 10);
        assert!(!report.is_complete());
    }
}
