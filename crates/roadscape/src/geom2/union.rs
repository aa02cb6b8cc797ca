//! Boundary union of a polygon layer (break, then keep uncovered edges).
//!
//! Model
//! - Break: every proper crossing between edges of two different polygons
//!   splits both edges at the crossing point.
//! - Union: an edge survives when no other polygon of the layer contains its
//!   midpoint. A midpoint within `EPSILON` of the other polygon's boundary is
//!   not contained; such edges are shared boundary (coincident arc chords of
//!   crossing roads) and survive once.
//! - The result is a flat edge set, not reassembled into loops.
//!
//! Cost
//! - Breaking is O(P² · S²) for P polygons of S edges each and dominates
//!   world regeneration.

use super::polygon::Polygon;
use super::types::{intersect, Segment, EPSILON};

/// Split crossing edges of two edge lists in place.
///
/// A crossing splits only when it is strictly inside both edges; endpoint
/// touches leave the edges alone. After a split the shortened edge keeps
/// being tested against the remaining edges of `b`.
pub fn break_pair(a: &mut Vec<Segment>, b: &mut Vec<Segment>) {
    let mut i = 0;
    while i < a.len() {
        let mut j = 0;
        while j < b.len() {
            if let Some(hit) = intersect(&a[i], &b[j]) {
                if hit.is_proper() {
                    let p = hit.point;
                    let a_tail = a[i].to;
                    a[i].to = p;
                    a.insert(i + 1, Segment::new(p, a_tail));
                    let b_tail = b[j].to;
                    b[j].to = p;
                    b.insert(j + 1, Segment::new(p, b_tail));
                }
            }
            j += 1;
        }
        i += 1;
    }
}

/// Break every unordered pair of edge lists.
pub fn multi_break(edges: &mut [Vec<Segment>]) {
    for i in 0..edges.len() {
        let (head, tail) = edges.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            break_pair(a, b);
        }
    }
}

/// Merged outer boundary of `polygons`.
///
/// Containment is tested against the unbroken input polygons so that a
/// split vertex never counts twice on a containment ray. Edges that match an
/// already kept edge within `EPSILON` are dropped.
pub fn union(polygons: &[Polygon]) -> Vec<Segment> {
    let mut edges: Vec<Vec<Segment>> = polygons.iter().map(Polygon::segments).collect();
    multi_break(&mut edges);

    let mut kept: Vec<Segment> = Vec::new();
    for (i, ring) in edges.iter().enumerate() {
        for seg in ring {
            let covered = polygons
                .iter()
                .enumerate()
                .any(|(j, poly)| i != j && covers(poly, seg));
            if !covered && !kept.iter().any(|k| k.approx_eq(seg, EPSILON)) {
                kept.push(*seg);
            }
        }
    }
    tracing::trace!(polygons = polygons.len(), kept = kept.len(), "union");
    kept
}

/// Midpoint strictly inside `poly`, off its boundary.
fn covers(poly: &Polygon, seg: &Segment) -> bool {
    let m = seg.midpoint();
    poly.contains_point(m) && poly.distance_to_point(m) > EPSILON
}
