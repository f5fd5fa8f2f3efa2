use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::part::{JointKind, PartId};

/// Inclusive angular range in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f32,
    pub max: f32,
}

impl AxisRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn symmetric(half_angle: f32) -> Self {
        Self::new(-half_angle.abs(), half_angle.abs())
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Per-axis rotation limits of a spherical joint. `None` leaves an axis free.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngularLimits {
    pub x: Option<AxisRange>,
    pub y: Option<AxisRange>,
    pub z: Option<AxisRange>,
}

impl AngularLimits {
    /// Same symmetric range on all three axes.
    pub fn cone(half_angle: f32) -> Self {
        let range = Some(AxisRange::symmetric(half_angle));
        Self {
            x: range,
            y: range,
            z: range,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .flatten()
            .all(AxisRange::is_valid)
    }
}

/// Soft-constraint parameters. Absent means rigid within solver tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointCompliance {
    pub stiffness: f32,
    pub damping: f32,
}

impl JointCompliance {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self { stiffness, damping }
    }
}

/// Immutable joint between a parent part (`a`) and its child (`b`).
///
/// Anchors are expressed in each body's local frame. Bodies start with identity
/// rotation, so at rest the local and world offsets coincide and
/// `anchor_on_a + anchor_on_b` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joint {
    pub kind: JointKind,
    pub part_a: PartId,
    pub part_b: PartId,
    pub anchor_on_a: Vec3,
    pub anchor_on_b: Vec3,
    pub limits: Option<AngularLimits>,
    pub compliance: Option<JointCompliance>,
}

impl Joint {
    /// World-space pivot seen from each side, given the bodies' positions.
    pub fn pivots(&self, position_a: Vec3, position_b: Vec3) -> (Vec3, Vec3) {
        (position_a + self.anchor_on_a, position_b + self.anchor_on_b)
    }

    pub fn is_rigid(&self) -> bool {
        self.compliance.is_none()
    }
}
