use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::joint::{AngularLimits, JointCompliance};

/// Stable identifier of a body part ("root", "armL", "handR", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartId(String);

impl PartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PartId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Constraint used on the edge between a part and its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JointKind {
    /// Three rotational degrees of freedom around a shared pivot.
    #[default]
    Spherical,
    /// No relative motion.
    Fixed,
}

/// Whether a table entry is part of the figure or a fixed point in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartRole {
    #[default]
    Segment,
    /// Immovable anchor. Declared `Anchored`, never dragged or reset.
    WorldAnchor,
}

/// One entry of the static part table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPart {
    pub id: PartId,
    pub rest_position: Vec3,
    /// Half-extents of the box collider.
    pub collider_extents: Vec3,
    pub parent: Option<PartId>,
    pub joint_kind: JointKind,
    pub limits: Option<AngularLimits>,
    pub compliance: Option<JointCompliance>,
    pub role: PartRole,
    /// Dropped by the assembler unless extremities are enabled.
    pub optional: bool,
}

impl BodyPart {
    pub fn new(id: impl Into<PartId>, rest_position: Vec3, collider_extents: Vec3) -> Self {
        Self {
            id: id.into(),
            rest_position,
            collider_extents,
            parent: None,
            joint_kind: JointKind::Spherical,
            limits: None,
            compliance: None,
            role: PartRole::Segment,
            optional: false,
        }
    }

    /// A fixed point in the world that other parts may hang from.
    pub fn world_anchor(id: impl Into<PartId>, position: Vec3) -> Self {
        Self {
            role: PartRole::WorldAnchor,
            ..Self::new(id, position, Vec3::ZERO)
        }
    }

    pub fn attached_to(mut self, parent: impl Into<PartId>, kind: JointKind) -> Self {
        self.parent = Some(parent.into());
        self.joint_kind = kind;
        self
    }

    pub fn with_limits(mut self, limits: AngularLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_compliance(mut self, compliance: JointCompliance) -> Self {
        self.compliance = Some(compliance);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self.role, PartRole::WorldAnchor)
    }
}
