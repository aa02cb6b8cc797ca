//! Closed polygon as an ordered vertex loop.
//!
//! The edge list is derived from the vertex list on every call, so the two can
//! never disagree: `segments().len() == points().len()`.

use nalgebra::Vector2;

use super::types::{intersect, Element, Segment};

/// Origin of the containment ray. Must lie outside every generated polygon.
pub const OUTER_POINT: Vector2<f64> = Vector2::new(-10000.0, -10000.0);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    points: Vec<Vector2<f64>>,
}

impl Polygon {
    #[inline]
    pub fn new(points: Vec<Vector2<f64>>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Replace vertex `i`; out-of-range indices are ignored.
    pub fn set_point(&mut self, i: usize, p: Vector2<f64>) {
        if let Some(slot) = self.points.get_mut(i) {
            *slot = p;
        }
    }

    /// Edges `p[i] → p[(i + 1) % n]`, closing edge included.
    pub fn segments(&self) -> Vec<Segment> {
        let n = self.points.len();
        (0..n)
            .map(|i| Segment::new(self.points[i], self.points[(i + 1) % n]))
            .collect()
    }

    /// Ray-casting test from `OUTER_POINT`; odd crossing count means inside.
    ///
    /// A ray through a vertex hits both adjacent edges; no correction is applied.
    pub fn contains_point(&self, p: Vector2<f64>) -> bool {
        let ray = Segment::new(OUTER_POINT, p);
        let crossings = self
            .segments()
            .iter()
            .filter(|seg| intersect(&ray, seg).is_some())
            .count();
        crossings % 2 == 1
    }

    /// A segment is contained when its midpoint is.
    #[inline]
    pub fn contains_segment(&self, seg: &Segment) -> bool {
        self.contains_point(seg.midpoint())
    }

    pub fn contains(&self, element: Element) -> bool {
        match element {
            Element::Point(p) => self.contains_point(p),
            Element::Segment(s) => self.contains_segment(&s),
        }
    }

    /// Distance from `p` to the boundary (0 inside is not implied).
    pub fn distance_to_point(&self, p: Vector2<f64>) -> f64 {
        self.segments()
            .iter()
            .map(|s| s.distance_to(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Minimum boundary-to-boundary distance, checked in both directions.
    pub fn distance_to_polygon(&self, other: &Polygon) -> f64 {
        let there = self
            .points
            .iter()
            .map(|&p| other.distance_to_point(p))
            .fold(f64::INFINITY, f64::min);
        let back = other
            .points
            .iter()
            .map(|&p| self.distance_to_point(p))
            .fold(f64::INFINITY, f64::min);
        there.min(back)
    }

    /// True if any edge of `self` touches or crosses any edge of `other`.
    pub fn intersects(&self, other: &Polygon) -> bool {
        let theirs = other.segments();
        self.segments()
            .iter()
            .any(|a| theirs.iter().any(|b| intersect(a, b).is_some()))
    }

    /// Axis-aligned bounds `(min, max)`; `None` when empty.
    pub fn bounds(&self) -> Option<(Vector2<f64>, Vector2<f64>)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        }))
    }

    pub fn centroid(&self) -> Option<Vector2<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let sum = self.points.iter().fold(Vector2::zeros(), |acc, p| acc + p);
        Some(sum / self.points.len() as f64)
    }
}
