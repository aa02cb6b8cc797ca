//! Editable road graph: a point arena plus index-pair segments.
//!
//! Invariants
//! - No two points share a position (exact equality).
//! - No segment joins a point to itself; no two segments join the same
//!   unordered pair.
//! - Removing a point removes every segment that references it.
//!
//! Segments store arena indices, so a position lives in exactly one place.
//! Rejected mutations return `false`; out-of-range indices are logged and
//! ignored.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::geom2::{Element, Segment};
use crate::style::PointStyle;

/// Graph node: a position plus editor display state.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub position: Vector2<f64>,
    pub style: PointStyle,
}

impl Point {
    pub fn new(position: Vector2<f64>) -> Self {
        Self {
            position,
            style: PointStyle::default(),
        }
    }
}

/// Segment as two indices into the point arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

impl Edge {
    #[inline]
    fn joins(&self, a: usize, b: usize) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    #[inline]
    fn touches(&self, i: usize) -> bool {
        self.from == i || self.to == i
    }
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    points: Vec<Point>,
    edges: Vec<Edge>,
    revision: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Display state of point `i`; editing it is not a geometry change and
    /// leaves the revision alone.
    pub fn point_style_mut(&mut self, i: usize) -> Option<&mut PointStyle> {
        self.points.get_mut(i).map(|p| &mut p.style)
    }

    /// Bumped by every successful mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segment `i` resolved to positions.
    pub fn segment(&self, i: usize) -> Option<Segment> {
        let e = self.edges.get(i)?;
        Some(self.resolve(e))
    }

    /// All segments resolved to positions, in insertion order.
    pub fn segments(&self) -> Vec<Segment> {
        self.edges.iter().map(|e| self.resolve(e)).collect()
    }

    #[inline]
    fn resolve(&self, e: &Edge) -> Segment {
        Segment::new(self.points[e.from].position, self.points[e.to].position)
    }

    pub fn point_index(&self, pos: Vector2<f64>) -> Option<usize> {
        self.points.iter().position(|p| p.position == pos)
    }

    fn edge_index(&self, seg: &Segment) -> Option<usize> {
        let a = self.point_index(seg.from)?;
        let b = self.point_index(seg.to)?;
        self.edges.iter().position(|e| e.joins(a, b))
    }

    #[inline]
    pub fn contains_point(&self, pos: Vector2<f64>) -> bool {
        self.point_index(pos).is_some()
    }

    #[inline]
    pub fn contains_segment(&self, seg: &Segment) -> bool {
        self.edge_index(seg).is_some()
    }

    pub fn contains(&self, element: Element) -> bool {
        match element {
            Element::Point(p) => self.contains_point(p),
            Element::Segment(s) => self.contains_segment(&s),
        }
    }

    /// Add a point unless one already sits at `pos`.
    pub fn try_add_point(&mut self, pos: Vector2<f64>) -> bool {
        if self.contains_point(pos) {
            return false;
        }
        self.points.push(Point::new(pos));
        self.touch();
        true
    }

    /// Join two existing points.
    ///
    /// Fails if either endpoint is missing, the endpoints coincide, or the
    /// pair is already joined.
    pub fn try_add_segment(&mut self, from: Vector2<f64>, to: Vector2<f64>) -> bool {
        let (Some(a), Some(b)) = (self.point_index(from), self.point_index(to)) else {
            return false;
        };
        if a == b || self.edges.iter().any(|e| e.joins(a, b)) {
            return false;
        }
        self.edges.push(Edge { from: a, to: b });
        self.touch();
        true
    }

    /// Move point `i` to `pos`; rejected if another point already sits there.
    pub fn move_point(&mut self, i: usize, pos: Vector2<f64>) -> bool {
        if i >= self.points.len() {
            tracing::warn!(index = i, len = self.points.len(), "point index out of range");
            return false;
        }
        if self.points[i].position == pos {
            return true;
        }
        if self.contains_point(pos) {
            return false;
        }
        self.points[i].position = pos;
        self.touch();
        true
    }

    /// Remove segment `i`; out-of-range is a logged no-op.
    pub fn remove_segment_at_index(&mut self, i: usize) -> bool {
        if i >= self.edges.len() {
            tracing::warn!(index = i, len = self.edges.len(), "segment index out of range");
            return false;
        }
        self.edges.remove(i);
        self.touch();
        true
    }

    pub fn remove_segment(&mut self, seg: &Segment) -> bool {
        match self.edge_index(seg) {
            Some(i) => self.remove_segment_at_index(i),
            None => {
                tracing::debug!(?seg, "segment not in graph");
                false
            }
        }
    }

    /// Remove point `i` and every segment touching it.
    pub fn remove_point_at_index(&mut self, i: usize) -> bool {
        if i >= self.points.len() {
            tracing::warn!(index = i, len = self.points.len(), "point index out of range");
            return false;
        }
        self.points.remove(i);
        self.edges.retain(|e| !e.touches(i));
        for e in &mut self.edges {
            if e.from > i {
                e.from -= 1;
            }
            if e.to > i {
                e.to -= 1;
            }
        }
        self.touch();
        true
    }

    pub fn remove_point(&mut self, pos: Vector2<f64>) -> bool {
        match self.point_index(pos) {
            Some(i) => self.remove_point_at_index(i),
            None => {
                tracing::debug!(x = pos.x, y = pos.y, "point not in graph");
                false
            }
        }
    }

    pub fn segments_with_point(&self, pos: Vector2<f64>) -> Vec<Segment> {
        match self.point_index(pos) {
            Some(i) => self
                .edges
                .iter()
                .filter(|e| e.touches(i))
                .map(|e| self.resolve(e))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Index of the point nearest to `pos` closer than `threshold`.
    pub fn nearest_point(&self, pos: Vector2<f64>, threshold: f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = (p.position - pos).norm();
            if d < threshold && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn clear(&mut self) {
        if self.points.is_empty() && self.edges.is_empty() {
            return;
        }
        self.points.clear();
        self.edges.clear();
        self.touch();
    }

    #[inline]
    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Hash of the geometry: every point position and every segment's endpoints.
    ///
    /// Display state does not participate.
    pub fn content_hash(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.points.len().hash(&mut h);
        for p in &self.points {
            hash_vec(&mut h, p.position);
        }
        self.edges.len().hash(&mut h);
        for e in &self.edges {
            let s = self.resolve(e);
            hash_vec(&mut h, s.from);
            hash_vec(&mut h, s.to);
        }
        h.finish()
    }

    pub fn to_doc(&self) -> GraphDoc {
        GraphDoc {
            points: self.points.iter().map(|p| XY::from(p.position)).collect(),
            segments: self
                .edges
                .iter()
                .map(|e| {
                    let s = self.resolve(e);
                    SegmentDoc {
                        from: s.from.into(),
                        to: s.to.into(),
                    }
                })
                .collect(),
        }
    }

    /// Rebuild from a document: points first, then segments resolved by exact
    /// position. Unresolvable and duplicate entries are dropped.
    pub fn from_doc(doc: &GraphDoc) -> Self {
        let mut g = Graph::new();
        for p in &doc.points {
            g.try_add_point(p.into());
        }
        let mut dropped = 0usize;
        for s in &doc.segments {
            if !g.try_add_segment(s.from.into(), s.to.into()) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "segments dropped while loading graph");
        }
        g
    }

    pub fn to_json(&self) -> Result<String, WorldError> {
        Ok(serde_json::to_string(&self.to_doc())?)
    }

    pub fn from_json(s: &str) -> Result<Self, WorldError> {
        let doc: GraphDoc = serde_json::from_str(s)?;
        Ok(Self::from_doc(&doc))
    }
}

fn hash_vec(h: &mut DefaultHasher, v: Vector2<f64>) {
    v.x.to_bits().hash(h);
    v.y.to_bits().hash(h);
}

/// Persisted coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct XY {
    pub x: f64,
    pub y: f64,
}

impl From<Vector2<f64>> for XY {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<XY> for Vector2<f64> {
    fn from(p: XY) -> Self {
        Vector2::new(p.x, p.y)
    }
}

impl From<&XY> for Vector2<f64> {
    fn from(p: &XY) -> Self {
        Vector2::new(p.x, p.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentDoc {
    pub from: XY,
    pub to: XY,
}

/// Persistence shape: `{ points: [{x,y}], segments: [{from:{x,y}, to:{x,y}}] }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDoc {
    pub points: Vec<XY>,
    pub segments: Vec<SegmentDoc>,
}
