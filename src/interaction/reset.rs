use glam::{Quat, Vec3};
use log::{debug, warn};

use super::{
    commands::{BodyCommand, CommandBuffer},
    controller::DragController,
};
use crate::{backend::SimulationBackend, core::types::MotionMode, rig::ragdoll::Ragdoll};

/// Puts every tracked part back at its rest pose, at rest, under simulation.
pub struct ResetCoordinator;

impl ResetCoordinator {
    /// Queues the reset writes and drops any session on the affected parts.
    /// Returns how many parts were reset; parts without a live body are skipped.
    pub fn plan<B>(
        ragdoll: &Ragdoll,
        controller: &mut DragController,
        backend: &B,
        out: &mut CommandBuffer,
    ) -> usize
    where
        B: SimulationBackend + ?Sized,
    {
        let mut reset = 0;
        for part in ragdoll.tracked_parts() {
            controller.abandon(&part.id);

            let live = ragdoll
                .handle(&part.id)
                .is_some_and(|handle| backend.contains_body(handle));
            if !live {
                warn!("reset skipped '{}': no live body", part.id);
                continue;
            }

            let id = &part.id;
            out.set_translation(id, part.rest_position);
            out.push(BodyCommand::SetRotation {
                part: id.clone(),
                rotation: Quat::IDENTITY,
            });
            out.set_linear_velocity(id, Vec3::ZERO);
            out.push(BodyCommand::SetAngularVelocity {
                part: id.clone(),
                velocity: Vec3::ZERO,
            });
            out.set_mode(id, MotionMode::Simulated);
            reset += 1;
        }
        reset
    }

    /// Plans and applies a reset in one go.
    pub fn reset<B>(ragdoll: &Ragdoll, controller: &mut DragController, backend: &mut B) -> usize
    where
        B: SimulationBackend + ?Sized,
    {
        let mut out = CommandBuffer::new();
        let reset = Self::plan(ragdoll, controller, backend, &mut out);
        out.apply(ragdoll, backend);
        debug!("reset {reset} part(s)");
        reset
    }
}
