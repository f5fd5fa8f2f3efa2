use glam::Vec3;

/// Joint anchors for two bodies resting at `position_a` and `position_b`.
///
/// Both anchors land on the midpoint between the bodies, so the joint carries no
/// error at the rest pose. Also used for world anchors, with `position_a` being
/// the anchor's fixed position.
pub fn resolve_anchors(position_a: Vec3, position_b: Vec3) -> (Vec3, Vec3) {
    let half = (position_b - position_a) * 0.5;
    (half, -half)
}
