use nalgebra::Vector2;

/// Distance scale of the pseudo-3D lift: at this distance from the viewpoint
/// a point is lifted by half its height.
const FAKE_3D_FALLOFF: f64 = 300.0;

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec(a: Vector2<f64>, b: Vector2<f64>, t: f64) -> Vector2<f64> {
    a + (b - a) * t
}

/// Angle of `v` in radians, `atan2(y, x)`.
#[inline]
pub fn heading(v: Vector2<f64>) -> f64 {
    v.y.atan2(v.x)
}

/// Move `v` by `offset` along the direction `angle`.
#[inline]
pub fn translate(v: Vector2<f64>, angle: f64, offset: f64) -> Vector2<f64> {
    Vector2::new(v.x + angle.cos() * offset, v.y + angle.sin() * offset)
}

/// Counterclockwise perpendicular `(-y, x)`.
#[inline]
pub fn perp(v: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

#[inline]
pub fn midpoint(a: Vector2<f64>, b: Vector2<f64>) -> Vector2<f64> {
    (a + b) * 0.5
}

/// Lift `p` away from `view_point` to fake a vertical extrusion of `height`.
///
/// The lift saturates with distance (`atan` falloff), so far objects lean more
/// than near ones. A point at the viewpoint is not moved.
pub fn fake_3d_point(p: Vector2<f64>, view_point: Vector2<f64>, height: f64) -> Vector2<f64> {
    let d = p - view_point;
    let dist = d.norm();
    if dist <= 0.0 {
        return p;
    }
    let scaler = (dist / FAKE_3D_FALLOFF).atan() / std::f64::consts::FRAC_PI_2;
    p + d / dist * (height * scaler)
}
