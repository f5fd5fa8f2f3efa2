//! Built-in part tables.
//!
//! Every table is plain data; feed it to [`RagdollAssembler`](super::RagdollAssembler)
//! on its own or concatenated with others (each table is its own tree).

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::Vec3;

use crate::core::{
    joint::{AngularLimits, AxisRange, JointCompliance},
    part::{BodyPart, JointKind},
};

/// Pivots of the bars hanging around the default scene.
pub const PENDULUM_PIVOTS: [[f32; 3]; 6] = [
    [-2.0, 3.5, 0.0],
    [-5.0, 3.5, 0.0],
    [-7.0, 3.5, 0.0],
    [2.0, 3.5, 0.0],
    [5.0, 3.5, 0.0],
    [7.0, 3.5, 0.0],
];

/// Height the stick figure is dropped from in the default scene.
pub const STICK_FIGURE_DROP_HEIGHT: f32 = 15.0;

// Bone rest layout of the rigged figure, relative to its origin.
const ROOT_CENTER: [f32; 3] = [0.0, 0.876589, 0.0];
const HEAD_CENTER: [f32; 3] = [0.0, 1.73585, 0.0];
const ARM_CENTER: [f32; 3] = [0.785971, 1.16282, 0.139699];
const LEG_CENTER: [f32; 3] = [0.387086, 0.419553, 0.006382];

// (radius, length) of each bone.
const ROOT_BONE: (f32, f32) = (0.049009, 0.980182);
const HEAD_BONE: (f32, f32) = (0.073831, 0.73831);
const ARM_BONE: (f32, f32) = (0.020324, 0.306184);
const LEG_BONE: (f32, f32) = (0.033359, 0.310378);
const FOREARM_BONE: (f32, f32) = (0.018, 0.26);
const HAND_BONE: (f32, f32) = (0.03, 0.09);

fn upright((radius, length): (f32, f32)) -> Vec3 {
    Vec3::new(radius, length * 0.5, radius)
}

fn sideways((radius, length): (f32, f32)) -> Vec3 {
    Vec3::new(length * 0.5, radius, radius)
}

fn mirrored(v: [f32; 3]) -> Vec3 {
    Vec3::new(-v[0], v[1], v[2])
}

/// The rigged stick figure: root, head, arms and legs, plus optional
/// forearm/hand chains rigidly extending each arm.
pub fn stick_figure(origin: Vec3) -> Vec<BodyPart> {
    let shoulder = AngularLimits {
        x: Some(AxisRange::symmetric(FRAC_PI_2)),
        y: Some(AxisRange::symmetric(FRAC_PI_4)),
        z: Some(AxisRange::new(-FRAC_PI_2, 1.2)),
    };
    let hip = AngularLimits::cone(1.2);
    let neck = AngularLimits::cone(0.6);

    let mut parts = vec![
        BodyPart::new("root", origin + Vec3::from(ROOT_CENTER), upright(ROOT_BONE)),
        BodyPart::new("head", origin + Vec3::from(HEAD_CENTER), upright(HEAD_BONE))
            .attached_to("root", JointKind::Spherical)
            .with_limits(neck),
    ];

    for (side, sign, center) in [
        ("L", 1.0f32, Vec3::from(ARM_CENTER)),
        ("R", -1.0f32, mirrored(ARM_CENTER)),
    ] {
        let arm = origin + center;
        let arm_tip = arm.x + sign * ARM_BONE.1 * 0.5;
        let forearm = Vec3::new(arm_tip + sign * FOREARM_BONE.1 * 0.5, arm.y, arm.z);
        let forearm_tip = forearm.x + sign * FOREARM_BONE.1 * 0.5;
        let hand = Vec3::new(forearm_tip + sign * HAND_BONE.1 * 0.5, arm.y, arm.z);

        parts.push(
            BodyPart::new(format!("arm{side}"), arm, sideways(ARM_BONE))
                .attached_to("root", JointKind::Spherical)
                .with_limits(shoulder),
        );
        parts.push(
            BodyPart::new(format!("forearm{side}"), forearm, sideways(FOREARM_BONE))
                .attached_to(format!("arm{side}"), JointKind::Fixed)
                .optional(),
        );
        parts.push(
            BodyPart::new(format!("hand{side}"), hand, sideways(HAND_BONE))
                .attached_to(format!("forearm{side}"), JointKind::Fixed)
                .optional(),
        );
    }

    for (side, center) in [("L", Vec3::from(LEG_CENTER)), ("R", mirrored(LEG_CENTER))] {
        parts.push(
            BodyPart::new(format!("leg{side}"), origin + center, upright(LEG_BONE))
                .attached_to("root", JointKind::Spherical)
                .with_limits(hip),
        );
    }

    parts
}

/// Block figure: head, torso and pelvis column with two-piece arms and legs,
/// all joined by stiff spherical joints. The torso is the root.
pub fn segmented_figure(start_height: f32) -> Vec<BodyPart> {
    let stiff = JointCompliance::new(1000.0, 100.0);
    let limb = Vec3::new(0.15, 0.4, 0.15);
    let limb_drop = Vec3::new(0.0, -0.9, 0.0);
    let y = start_height;

    let mut parts = vec![
        BodyPart::new("torso", Vec3::new(0.0, y - 1.5, 0.0), Vec3::new(0.2, 0.6, 0.2)),
        BodyPart::new("head", Vec3::new(0.0, y, 0.0), Vec3::splat(0.3))
            .attached_to("torso", JointKind::Spherical)
            .with_compliance(stiff),
        BodyPart::new("pelvis", Vec3::new(0.0, y - 3.0, 0.0), Vec3::new(0.25, 0.2, 0.25))
            .attached_to("torso", JointKind::Spherical)
            .with_compliance(stiff),
    ];

    let limbs = [
        ("armL", "torso", Vec3::new(-1.2, y - 1.5, 0.0)),
        ("armR", "torso", Vec3::new(1.2, y - 1.5, 0.0)),
        ("legL", "pelvis", Vec3::new(-0.6, y - 3.5, 0.0)),
        ("legR", "pelvis", Vec3::new(0.6, y - 3.5, 0.0)),
    ];

    for (name, parent, upper) in limbs {
        parts.push(
            BodyPart::new(format!("{name}Upper"), upper, limb)
                .attached_to(parent, JointKind::Spherical)
                .with_compliance(stiff),
        );
        parts.push(
            BodyPart::new(format!("{name}Lower"), upper + limb_drop, limb)
                .attached_to(format!("{name}Upper"), JointKind::Spherical)
                .with_compliance(stiff),
        );
    }

    parts
}

/// One bar per pivot, hanging from a world anchor.
pub fn hanging_pendulums(pivots: &[Vec3]) -> Vec<BodyPart> {
    pivots
        .iter()
        .enumerate()
        .flat_map(|(i, &pivot)| {
            let anchor = format!("pivot{i}");
            [
                BodyPart::world_anchor(anchor.clone(), pivot),
                BodyPart::new(
                    format!("pendulum{i}"),
                    pivot - Vec3::new(0.0, 2.0, 0.0),
                    Vec3::new(0.1, 2.0, 0.1),
                )
                .attached_to(anchor, JointKind::Spherical),
            ]
        })
        .collect()
}

/// Chain of unit cubes along +X, its first segment pinned in place.
pub fn rope(segments: usize, origin: Vec3) -> Vec<BodyPart> {
    (0..segments)
        .map(|i| {
            let position = origin + Vec3::X * i as f32;
            let id = format!("rope{i}");
            if i == 0 {
                BodyPart {
                    collider_extents: Vec3::splat(0.5),
                    ..BodyPart::world_anchor(id, position)
                }
            } else {
                BodyPart::new(id, position, Vec3::splat(0.5))
                    .attached_to(format!("rope{}", i - 1), JointKind::Spherical)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_figure_arm_chain_is_contiguous() {
        let parts = stick_figure(Vec3::ZERO);
        let find = |id: &str| parts.iter().find(|p| p.id.as_str() == id).unwrap();

        let arm = find("armL");
        let forearm = find("forearmL");
        let hand = find("handL");
        let arm_tip = arm.rest_position.x + arm.collider_extents.x;
        let forearm_base = forearm.rest_position.x - forearm.collider_extents.x;
        let forearm_tip = forearm.rest_position.x + forearm.collider_extents.x;
        let hand_base = hand.rest_position.x - hand.collider_extents.x;

        assert!((arm_tip - forearm_base).abs() < 1e-5);
        assert!((forearm_tip - hand_base).abs() < 1e-5);
        assert!(find("forearmR").rest_position.x < 0.0);
    }

    #[test]
    fn rope_head_is_anchor() {
        let parts = rope(4, Vec3::ZERO);
        assert!(parts[0].is_anchor());
        assert!(parts[1..].iter().all(|p| !p.is_anchor() && p.parent.is_some()));
    }
}
