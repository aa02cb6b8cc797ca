//! Segment, intersection and projection types.
//!
//! - `Segment`: value-type line segment between two positions.
//! - `Intersection`: crossing point plus the parameters on both segments.
//! - `Projection`: foot of the perpendicular plus its normalized offset.
//!
//! Code cross-refs: `polygon::Polygon`, `union::{break_pair, union}`

use nalgebra::Vector2;

use super::util::{lerp, perp};

/// Tolerance on the intersection determinant; below it lines count as parallel.
pub const EPSILON: f64 = 1e-6;

/// Parameter margin at segment ends; crossings this close to an endpoint are touches.
pub const SPLIT_EPSILON: f64 = 1e-9;

/// Line segment `from → to`.
///
/// Length, direction and perpendicular are derived on every call; nothing is cached.
/// Equality is unordered: `(a, b) == (b, a)`.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub from: Vector2<f64>,
    pub to: Vector2<f64>,
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.has(other.from) && self.has(other.to)
    }
}

/// Result of `intersect(a, b)`.
///
/// `offset` is the parameter on `a` (0 at `a.from`, 1 at `a.to`), `other_offset`
/// the parameter on `b`. Endpoint touches have an offset of exactly 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub point: Vector2<f64>,
    pub offset: f64,
    pub other_offset: f64,
}

impl Intersection {
    /// True when the crossing lies strictly inside both segments.
    ///
    /// Offsets within `SPLIT_EPSILON` of 0 or 1 count as endpoint touches, so
    /// rounding noise at shared vertices never produces sliver splits.
    #[inline]
    pub fn is_proper(&self) -> bool {
        let inside = |t: f64| t > SPLIT_EPSILON && t < 1.0 - SPLIT_EPSILON;
        inside(self.offset) && inside(self.other_offset)
    }
}

/// Orthogonal projection onto a segment's carrier line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub point: Vector2<f64>,
    pub offset: f64,
}

impl Segment {
    #[inline]
    pub fn new(from: Vector2<f64>, to: Vector2<f64>) -> Self {
        Self { from, to }
    }

    /// True if either endpoint equals `p` exactly.
    #[inline]
    pub fn has(&self, p: Vector2<f64>) -> bool {
        self.from == p || self.to == p
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.to - self.from).norm()
    }

    /// `to - from`.
    #[inline]
    pub fn vector(&self) -> Vector2<f64> {
        self.to - self.from
    }

    /// Unit direction; zero for a degenerate segment.
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.vector().try_normalize(0.0).unwrap_or_else(Vector2::zeros)
    }

    /// Perpendicular of `to - from` (not normalized).
    #[inline]
    pub fn perp(&self) -> Vector2<f64> {
        perp(self.vector())
    }

    #[inline]
    pub fn midpoint(&self) -> Vector2<f64> {
        (self.from + self.to) * 0.5
    }

    /// Project `p` onto the carrier line.
    ///
    /// Returns `None` for a zero-length segment (no carrier line).
    pub fn project(&self, p: Vector2<f64>) -> Option<Projection> {
        let b = self.vector();
        let len = b.norm();
        if len <= 0.0 {
            return None;
        }
        let dir = b / len;
        let scaler = (p - self.from).dot(&dir);
        Some(Projection {
            point: self.from + dir * scaler,
            offset: scaler / len,
        })
    }

    /// Distance from `p` to the segment.
    ///
    /// Uses the perpendicular foot when it lands strictly inside, else the
    /// nearer endpoint.
    pub fn distance_to(&self, p: Vector2<f64>) -> f64 {
        if let Some(proj) = self.project(p) {
            if proj.offset > 0.0 && proj.offset < 1.0 {
                return (p - proj.point).norm();
            }
        }
        (p - self.from).norm().min((p - self.to).norm())
    }

    /// Unordered equality with endpoints matched within `tol`.
    pub fn approx_eq(&self, other: &Segment, tol: f64) -> bool {
        let close = |a: Vector2<f64>, b: Vector2<f64>| (a - b).norm() <= tol;
        (close(self.from, other.from) && close(self.to, other.to))
            || (close(self.from, other.to) && close(self.to, other.from))
    }

    /// Same segment moved by `delta`.
    #[inline]
    pub fn translated(&self, delta: Vector2<f64>) -> Self {
        Self::new(self.from + delta, self.to + delta)
    }
}

/// Intersection of two closed segments.
///
/// Solves the 2×2 system with the cross-product formulation. Parallel and
/// collinear pairs (|det| ≤ `EPSILON`) report no intersection, overlapping
/// collinear segments included.
pub fn intersect(a: &Segment, b: &Segment) -> Option<Intersection> {
    let (pa, pb, pc, pd) = (a.from, a.to, b.from, b.to);
    let t_top = (pd.x - pc.x) * (pa.y - pc.y) - (pd.y - pc.y) * (pa.x - pc.x);
    let u_top = (pc.y - pa.y) * (pa.x - pb.x) - (pc.x - pa.x) * (pa.y - pb.y);
    let bottom = (pd.y - pc.y) * (pb.x - pa.x) - (pd.x - pc.x) * (pb.y - pa.y);

    if bottom.abs() <= EPSILON {
        return None;
    }
    let t = t_top / bottom;
    let u = u_top / bottom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Intersection {
            point: Vector2::new(lerp(pa.x, pb.x, t), lerp(pa.y, pb.y, t)),
            offset: t,
            other_offset: u,
        })
    } else {
        None
    }
}

/// Query target for overloaded containment checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Element {
    Point(Vector2<f64>),
    Segment(Segment),
}
