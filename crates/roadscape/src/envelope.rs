//! Rounded capsule ("envelope") around a skeleton segment.
//!
//! Two half-circle arcs of radius `width / 2`, one around each endpoint, each
//! sampled with `roundness + 1` points (angular step `π / roundness`). The
//! concatenated arcs form a convex, non-self-intersecting loop; `roundness = 1`
//! yields a plain rectangle.

use nalgebra::Vector2;

use crate::geom2::{heading, translate, Polygon, Segment};
use crate::style::Style;

/// Arc subdivision used for roads unless configured otherwise.
pub const DEFAULT_ROUNDNESS: u32 = 10;

#[derive(Clone, Debug)]
pub struct Envelope {
    skeleton: Segment,
    width: f64,
    roundness: u32,
    polygon: Polygon,
    pub style: Style,
}

impl Envelope {
    /// Build an envelope; `roundness` below 1 is treated as 1.
    pub fn new(skeleton: Segment, width: f64, roundness: u32) -> Self {
        Self::with_style(skeleton, width, roundness, Style::road())
    }

    pub fn with_style(skeleton: Segment, width: f64, roundness: u32, style: Style) -> Self {
        let roundness = roundness.max(1);
        let polygon = capsule(&skeleton, width, roundness);
        Self {
            skeleton,
            width,
            roundness,
            polygon,
            style,
        }
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn into_polygon(self) -> Polygon {
        self.polygon
    }

    #[inline]
    pub fn skeleton(&self) -> &Segment {
        &self.skeleton
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn roundness(&self) -> u32 {
        self.roundness
    }
}

fn capsule(skeleton: &Segment, width: f64, roundness: u32) -> Polygon {
    let radius = width * 0.5;
    let alpha = heading(skeleton.from - skeleton.to);
    let start = alpha - std::f64::consts::FRAC_PI_2;
    let step = std::f64::consts::PI / f64::from(roundness);

    let mut points: Vec<Vector2<f64>> = Vec::with_capacity(2 * (roundness as usize + 1));
    for k in 0..=roundness {
        points.push(translate(skeleton.from, start + step * f64::from(k), radius));
    }
    for k in 0..=roundness {
        let angle = std::f64::consts::PI + start + step * f64::from(k);
        points.push(translate(skeleton.to, angle, radius));
    }
    Polygon::new(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::intersect;
    use nalgebra::vector;

    fn is_simple(poly: &Polygon) -> bool {
        let segs = poly.segments();
        let n = segs.len();
        for i in 0..n {
            for j in (i + 1)..n {
                // neighbours share an endpoint
                if j == i + 1 || (i == 0 && j == n - 1) {
                    continue;
                }
                if let Some(hit) = intersect(&segs[i], &segs[j]) {
                    if hit.is_proper() {
                        return false;
                    }
                }
            }
        }
        true
    }

    #[test]
    fn point_count_and_radius() {
        let seg = Segment::new(vector![0.0, 0.0], vector![100.0, 0.0]);
        let env = Envelope::new(seg, 20.0, 10);
        assert_eq!(env.polygon().len(), 22);
        for p in env.polygon().points() {
            assert!((seg.distance_to(*p) - 10.0).abs() < 1e-9);
        }
        assert!(env.polygon().contains_point(vector![50.0, 0.0]));
        assert!(!env.polygon().contains_point(vector![50.0, 11.0]));
    }

    #[test]
    fn roundness_one_is_rectangle() {
        let seg = Segment::new(vector![0.0, 0.0], vector![0.0, 40.0]);
        let env = Envelope::new(seg, 10.0, 1);
        assert_eq!(env.polygon().len(), 4);
        let (lo, hi) = env.polygon().bounds().unwrap();
        assert!((lo - vector![-5.0, 0.0]).norm() < 1e-9);
        assert!((hi - vector![5.0, 40.0]).norm() < 1e-9);
        // zero roundness is clamped
        assert_eq!(Envelope::new(seg, 10.0, 0).roundness(), 1);
    }

    #[test]
    fn capsules_are_simple() {
        let seg = Segment::new(vector![-3.0, 7.0], vector![41.0, -12.0]);
        for roundness in [1, 2, 3, 10, 25] {
            for width in [0.5, 10.0, 150.0] {
                assert!(is_simple(Envelope::new(seg, width, roundness).polygon()));
            }
        }
    }
}
