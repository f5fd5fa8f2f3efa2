use std::collections::{BTreeMap, HashMap};

use glam::Vec3;
use log::debug;

use super::assembler::RagdollBlueprint;
use crate::{
    backend::{BodyHandle, JointHandle, RayHit, SimulationBackend},
    core::{
        part::{BodyPart, PartId},
        types::MotionMode,
    },
    interaction::{controller::LiveBodies, input::Ray},
};

/// A blueprint spawned into a backend: the part table plus the live handles
/// the engine returned for it.
#[derive(Debug, Clone)]
pub struct Ragdoll {
    blueprint: RagdollBlueprint,
    handles: BTreeMap<PartId, BodyHandle>,
    parts_by_handle: HashMap<BodyHandle, PartId>,
    joints: Vec<JointHandle>,
}

impl Ragdoll {
    /// Declares every body, then every joint. Runs once per figure.
    pub fn spawn<B>(blueprint: RagdollBlueprint, backend: &mut B) -> Self
    where
        B: SimulationBackend + ?Sized,
    {
        let mut handles = BTreeMap::new();
        let mut parts_by_handle = HashMap::new();

        for desc in blueprint.bodies() {
            let handle = backend.create_rigid_body(desc);
            handles.insert(desc.part.clone(), handle);
            parts_by_handle.insert(handle, desc.part.clone());
        }

        let joints = blueprint
            .joints()
            .iter()
            .filter_map(|joint| {
                let a = handles.get(&joint.part_a)?;
                let b = handles.get(&joint.part_b)?;
                Some(backend.create_joint(joint, *a, *b))
            })
            .collect::<Vec<_>>();

        debug!(
            "spawned ragdoll into '{}': {} bodies, {} joints",
            backend.name(),
            handles.len(),
            joints.len()
        );

        Self {
            blueprint,
            handles,
            parts_by_handle,
            joints,
        }
    }

    pub fn blueprint(&self) -> &RagdollBlueprint {
        &self.blueprint
    }

    pub fn handle(&self, part: &PartId) -> Option<BodyHandle> {
        self.handles.get(part).copied()
    }

    pub fn part_for(&self, handle: BodyHandle) -> Option<&PartId> {
        self.parts_by_handle.get(&handle)
    }

    pub fn joint_handles(&self) -> &[JointHandle] {
        &self.joints
    }

    /// Parts that can be dragged and reset (everything but world anchors).
    pub fn tracked_parts(&self) -> impl Iterator<Item = &BodyPart> + '_ {
        self.blueprint.parts().iter().filter(|part| !part.is_anchor())
    }

    pub fn rest_position(&self, part: &PartId) -> Option<Vec3> {
        self.blueprint.part(part).map(|p| p.rest_position)
    }

    /// Closest part of this figure under `ray`, as reported by the engine.
    pub fn pick<B>(&self, backend: &B, ray: &Ray, max_distance: f32) -> Option<(PartId, RayHit)>
    where
        B: SimulationBackend + ?Sized,
    {
        let hit = backend.cast_ray(ray, max_distance)?;
        self.part_for(hit.body).map(|part| (part.clone(), hit))
    }

    /// Read-only view pairing the id map with the engine's state.
    pub fn view<'a, B>(&'a self, backend: &'a B) -> LiveView<'a, B>
    where
        B: SimulationBackend + ?Sized,
    {
        LiveView {
            ragdoll: self,
            backend,
        }
    }
}

pub struct LiveView<'a, B: ?Sized> {
    ragdoll: &'a Ragdoll,
    backend: &'a B,
}

impl<B> LiveBodies for LiveView<'_, B>
where
    B: SimulationBackend + ?Sized,
{
    fn translation(&self, part: &PartId) -> Option<Vec3> {
        let handle = self.ragdoll.handle(part)?;
        self.backend.translation(handle)
    }

    fn motion_mode(&self, part: &PartId) -> Option<MotionMode> {
        let handle = self.ragdoll.handle(part)?;
        self.backend.motion_mode(handle)
    }
}
