//! Building footprints along road fronts.
//!
//! Model
//! - Oversized road envelopes (road + building width + 2·spacing) are merged
//!   with `union`; the surviving edges are the guides.
//! - Each guide is cut into equal supports separated by `spacing`, each
//!   support is pushed sideways by a random offset, and a rectangular
//!   envelope of `width` is raised on it.
//! - A single forward pass drops every footprint that crosses, or comes closer
//!   than `spacing` to, an earlier survivor. The pass is greedy, not optimal.
//!
//! Code cross-refs: `geom2::union`, `envelope::Envelope`, `config::BuildingCfg`

use nalgebra::Vector2;
use rand::Rng;

use crate::config::{BuildingCfg, RoadCfg};
use crate::envelope::Envelope;
use crate::geom2::{fake_3d_point, heading, lerp, translate, union, Polygon, Segment, EPSILON};
use crate::style::Style;

/// Footprint plus its pseudo-3D roof and walls.
#[derive(Clone, Debug)]
pub struct Building {
    base: Polygon,
    ceiling: Polygon,
    sides: Vec<Polygon>,
    height: f64,
    pub style: Style,
}

impl Building {
    pub fn new(base: Polygon, height: f64, view_point: Vector2<f64>) -> Self {
        let ceiling = lift(&base, height, view_point);
        let sides = walls(&base, &ceiling, view_point);
        Self {
            base,
            ceiling,
            sides,
            height,
            style: Style::building(),
        }
    }

    /// Re-lift the roof for a new viewpoint and re-sort walls far to near.
    pub fn update(&mut self, view_point: Vector2<f64>) {
        for (i, p) in self.base.points().iter().enumerate() {
            self.ceiling
                .set_point(i, fake_3d_point(*p, view_point, self.height));
        }
        self.sides = walls(&self.base, &self.ceiling, view_point);
    }

    #[inline]
    pub fn base(&self) -> &Polygon {
        &self.base
    }

    #[inline]
    pub fn ceiling(&self) -> &Polygon {
        &self.ceiling
    }

    /// Walls in back-to-front order for the last viewpoint.
    #[inline]
    pub fn sides(&self) -> &[Polygon] {
        &self.sides
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Painter's key: distance from the footprint boundary to `p`.
    #[inline]
    pub fn distance_to(&self, p: Vector2<f64>) -> f64 {
        self.base.distance_to_point(p)
    }
}

fn lift(base: &Polygon, height: f64, view_point: Vector2<f64>) -> Polygon {
    Polygon::new(
        base.points()
            .iter()
            .map(|p| fake_3d_point(*p, view_point, height))
            .collect(),
    )
}

fn walls(base: &Polygon, ceiling: &Polygon, view_point: Vector2<f64>) -> Vec<Polygon> {
    let b = base.points();
    let c = ceiling.points();
    let n = b.len();
    let mut sides: Vec<Polygon> = (0..n)
        .map(|i| {
            let k = (i + 1) % n;
            Polygon::new(vec![b[i], b[k], c[k], c[i]])
        })
        .collect();
    sides.sort_by(|x, y| {
        let dx = x.distance_to_point(view_point);
        let dy = y.distance_to_point(view_point);
        dy.partial_cmp(&dx).unwrap_or(std::cmp::Ordering::Equal)
    });
    sides
}

/// Guide edges: merged boundary of the oversized road envelopes, minus short ones.
pub fn guides(roads: &[Segment], road: &RoadCfg, cfg: &BuildingCfg) -> Vec<Segment> {
    let width = road.width + cfg.width + cfg.spacing * 2.0;
    let envelopes: Vec<Polygon> = roads
        .iter()
        .map(|s| Envelope::new(*s, width, road.roundness).into_polygon())
        .collect();
    let mut out = union(&envelopes);
    out.retain(|g| g.length() >= cfg.min_length);
    out
}

/// Cut `guide` into evenly spaced supports and jitter each sideways.
///
/// Draws one offset per support from `rng`, in guide order.
pub fn supports<R: Rng + ?Sized>(guide: &Segment, cfg: &BuildingCfg, rng: &mut R) -> Vec<Segment> {
    let len = guide.length() + cfg.spacing;
    let count = (len / (cfg.min_length + cfg.spacing)).floor();
    if !(count >= 1.0) || !count.is_finite() {
        return Vec::new();
    }
    let building_length = len / count - cfg.spacing;
    let dir = guide.direction();

    let mut out = Vec::with_capacity(count as usize);
    let mut q1 = guide.from;
    for _ in 0..count as usize {
        let q2 = q1 + dir * building_length;
        let support = Segment::new(q1, q2);
        let angle = heading(support.perp());
        let shift = lerp(cfg.min_offset, cfg.max_offset, rng.gen::<f64>());
        out.push(Segment::new(
            translate(support.from, angle, shift),
            translate(support.to, angle, shift),
        ));
        q1 = q2 + dir * cfg.spacing;
    }
    out
}

/// Drop footprints that cross or crowd an earlier survivor.
pub fn prune(mut bases: Vec<Polygon>, spacing: f64) -> Vec<Polygon> {
    let mut i = 0;
    while i + 1 < bases.len() {
        let mut j = i + 1;
        while j < bases.len() {
            if bases[i].intersects(&bases[j])
                || bases[i].distance_to_polygon(&bases[j]) < spacing - EPSILON
            {
                bases.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    bases
}

/// Footprints for a road network.
pub fn footprints<R: Rng + ?Sized>(
    roads: &[Segment],
    road: &RoadCfg,
    cfg: &BuildingCfg,
    rng: &mut R,
) -> Vec<Polygon> {
    let guides = guides(roads, road, cfg);
    let mut bases = Vec::new();
    for guide in &guides {
        for support in supports(guide, cfg, rng) {
            bases.push(Envelope::new(support, cfg.width, 1).into_polygon());
        }
    }
    let candidates = bases.len();
    let kept = prune(bases, cfg.spacing);
    tracing::debug!(
        guides = guides.len(),
        candidates,
        kept = kept.len(),
        "building footprints"
    );
    kept
}
