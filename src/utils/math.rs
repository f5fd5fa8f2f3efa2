//! Additional math helpers layered on top of `glam`.

use glam::Vec3;

/// Removes the component of `v` along the unit `normal`, leaving the in-plane part.
pub fn project_onto_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

/// Component-wise `a + (b - a) * t`.
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Scales `v` down to `max_length` if it is longer.
pub fn clamp_length(v: Vec3, max_length: f32) -> Vec3 {
    let length_sq = v.length_squared();
    if length_sq > max_length * max_length && length_sq > 0.0 {
        v * (max_length / length_sq.sqrt())
    } else {
        v
    }
}
