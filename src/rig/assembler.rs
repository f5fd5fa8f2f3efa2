use std::collections::HashMap;

use log::debug;

use super::anchors::resolve_anchors;
use crate::{
    backend::RigidBodyDesc,
    config::AssemblyConfig,
    core::{
        joint::{Joint, JointCompliance},
        part::{BodyPart, JointKind, PartId},
        types::{MotionMode, Transform},
    },
    error::{RagdollError, Result},
    utils::logging::ScopedTimer,
};

/// Declarations produced from a part table, ready to spawn into a backend.
///
/// Parts, bodies and joints are ordered parents-first.
#[derive(Debug, Clone)]
pub struct RagdollBlueprint {
    parts: Vec<BodyPart>,
    bodies: Vec<RigidBodyDesc>,
    joints: Vec<Joint>,
    index: HashMap<PartId, usize>,
}

impl RagdollBlueprint {
    pub fn parts(&self) -> &[BodyPart] {
        &self.parts
    }

    pub fn bodies(&self) -> &[RigidBodyDesc] {
        &self.bodies
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn part(&self, id: &PartId) -> Option<&BodyPart> {
        self.index.get(id).map(|&i| &self.parts[i])
    }

    pub fn contains(&self, id: &PartId) -> bool {
        self.index.contains_key(id)
    }

    pub fn roots(&self) -> impl Iterator<Item = &BodyPart> + '_ {
        self.parts.iter().filter(|part| part.parent.is_none())
    }
}

/// Turns a static part table into body and joint declarations.
#[derive(Debug, Clone, Default)]
pub struct RagdollAssembler {
    config: AssemblyConfig,
}

impl RagdollAssembler {
    pub fn new(config: AssemblyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn assemble(&self, table: &[BodyPart]) -> Result<RagdollBlueprint> {
        let _timer = ScopedTimer::new("ragdoll::assemble");

        let index = index_table(table)?;
        let parents = resolve_parents(table, &index)?;
        let depths = check_acyclic(table, &parents)?;

        for part in table {
            if let Some(limits) = &part.limits {
                if !limits.is_valid() || part.joint_kind == JointKind::Fixed {
                    return Err(RagdollError::InvalidLimits {
                        part: part.id.clone(),
                    });
                }
            }
        }

        let mut order: Vec<usize> = (0..table.len()).collect();
        order.sort_by_key(|&i| (depths[i], i));

        // Parents come first in `order`, so a dropped parent is known before its children.
        let mut included = vec![false; table.len()];
        for &i in &order {
            let wanted = !table[i].optional || self.config.include_extremities;
            let keep = wanted && parents[i].map_or(true, |p| included[p]);
            included[i] = keep;
        }

        let parts: Vec<BodyPart> = order
            .iter()
            .filter(|&&i| included[i])
            .map(|&i| table[i].clone())
            .collect();

        if parts.is_empty() {
            return Err(RagdollError::EmptyTable);
        }

        let index: HashMap<PartId, usize> = parts
            .iter()
            .enumerate()
            .map(|(i, part)| (part.id.clone(), i))
            .collect();

        let bodies = parts.iter().map(|part| self.declare_body(part)).collect();

        let joints: Vec<Joint> = parts
            .iter()
            .filter_map(|part| {
                let parent = part.parent.as_ref()?;
                let parent_part = &parts[index[parent]];
                Some(self.declare_joint(parent_part, part))
            })
            .collect();

        debug!(
            "assembled ragdoll: {} parts, {} joints ({} omitted)",
            parts.len(),
            joints.len(),
            table.len() - parts.len()
        );

        Ok(RagdollBlueprint {
            parts,
            bodies,
            joints,
            index,
        })
    }

    fn declare_body(&self, part: &BodyPart) -> RigidBodyDesc {
        let bodies = &self.config.bodies;
        RigidBodyDesc {
            part: part.id.clone(),
            half_extents: part.collider_extents,
            transform: Transform::from_position(part.rest_position),
            mode: if part.is_anchor() {
                MotionMode::Anchored
            } else {
                MotionMode::Simulated
            },
            linear_damping: bodies.linear_damping,
            angular_damping: bodies.angular_damping,
            friction: bodies.friction,
        }
    }

    fn declare_joint(&self, parent: &BodyPart, child: &BodyPart) -> Joint {
        let (anchor_on_a, anchor_on_b) = resolve_anchors(parent.rest_position, child.rest_position);

        let compliance = match (child.compliance, child.joint_kind) {
            (Some(explicit), _) => Some(explicit),
            (None, JointKind::Spherical) if self.config.soft_joints => Some(JointCompliance::new(
                self.config.joints.stiffness,
                self.config.joints.damping,
            )),
            _ => None,
        };

        Joint {
            kind: child.joint_kind,
            part_a: parent.id.clone(),
            part_b: child.id.clone(),
            anchor_on_a,
            anchor_on_b,
            limits: child.limits,
            compliance,
        }
    }
}

fn index_table(table: &[BodyPart]) -> Result<HashMap<&PartId, usize>> {
    let mut index = HashMap::with_capacity(table.len());
    for (i, part) in table.iter().enumerate() {
        if index.insert(&part.id, i).is_some() {
            return Err(RagdollError::DuplicatePart(part.id.clone()));
        }
    }
    Ok(index)
}

fn resolve_parents(table: &[BodyPart], index: &HashMap<&PartId, usize>) -> Result<Vec<Option<usize>>> {
    table
        .iter()
        .map(|part| match &part.parent {
            None => Ok(None),
            Some(parent) => index
                .get(parent)
                .copied()
                .map(Some)
                .ok_or_else(|| RagdollError::UnknownParent {
                    part: part.id.clone(),
                    parent: parent.clone(),
                }),
        })
        .collect()
}

/// Walks every parent chain once. Returns each part's depth below its root.
fn check_acyclic(table: &[BodyPart], parents: &[Option<usize>]) -> Result<Vec<usize>> {
    const UNSEEN: usize = usize::MAX;
    const ON_PATH: usize = usize::MAX - 1;

    let mut depth = vec![UNSEEN; table.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..table.len() {
        let mut cursor = Some(start);
        path.clear();

        // Climb until a root or an already-resolved part.
        let base = loop {
            match cursor {
                None => break 0,
                Some(i) if depth[i] == ON_PATH => {
                    let first = path.iter().position(|&p| p == i).unwrap_or(0);
                    let mut cycle: Vec<PartId> =
                        path[first..].iter().map(|&p| table[p].id.clone()).collect();
                    cycle.push(table[i].id.clone());
                    return Err(RagdollError::CyclicJointGraph { cycle });
                }
                Some(i) if depth[i] != UNSEEN => break depth[i] + 1,
                Some(i) => {
                    depth[i] = ON_PATH;
                    path.push(i);
                    cursor = parents[i];
                }
            }
        };

        for (offset, &i) in path.iter().rev().enumerate() {
            depth[i] = base + offset;
        }
    }

    Ok(depth)
}
