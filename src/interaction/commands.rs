use glam::{Quat, Vec3};
use log::warn;

use crate::{
    backend::SimulationBackend,
    core::{part::PartId, types::MotionMode},
    rig::ragdoll::Ragdoll,
};

/// One write to a live body, addressed by part id.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyCommand {
    SetMotionMode { part: PartId, mode: MotionMode },
    SetTranslation { part: PartId, translation: Vec3 },
    SetRotation { part: PartId, rotation: Quat },
    SetLinearVelocity { part: PartId, velocity: Vec3 },
    SetAngularVelocity { part: PartId, velocity: Vec3 },
}

impl BodyCommand {
    pub fn part(&self) -> &PartId {
        match self {
            Self::SetMotionMode { part, .. }
            | Self::SetTranslation { part, .. }
            | Self::SetRotation { part, .. }
            | Self::SetLinearVelocity { part, .. }
            | Self::SetAngularVelocity { part, .. } => part,
        }
    }
}

/// Writes produced by one controller call, applied in order before the physics step.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    commands: Vec<BodyCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: BodyCommand) {
        self.commands.push(command);
    }

    pub fn set_mode(&mut self, part: &PartId, mode: MotionMode) {
        self.push(BodyCommand::SetMotionMode {
            part: part.clone(),
            mode,
        });
    }

    pub fn set_translation(&mut self, part: &PartId, translation: Vec3) {
        self.push(BodyCommand::SetTranslation {
            part: part.clone(),
            translation,
        });
    }

    pub fn set_linear_velocity(&mut self, part: &PartId, velocity: Vec3) {
        self.push(BodyCommand::SetLinearVelocity {
            part: part.clone(),
            velocity,
        });
    }

    pub fn commands(&self) -> &[BodyCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Last mode written for `part` in this buffer.
    pub fn last_mode(&self, part: &PartId) -> Option<MotionMode> {
        self.commands.iter().rev().find_map(|command| match command {
            BodyCommand::SetMotionMode { part: p, mode } if p == part => Some(*mode),
            _ => None,
        })
    }

    /// Last linear velocity written for `part` in this buffer.
    pub fn last_linear_velocity(&self, part: &PartId) -> Option<Vec3> {
        self.commands.iter().rev().find_map(|command| match command {
            BodyCommand::SetLinearVelocity { part: p, velocity } if p == part => Some(*velocity),
            _ => None,
        })
    }

    /// Sends every write to the engine and empties the buffer. Returns how many landed.
    ///
    /// Writes for parts without a live handle are skipped with a warning.
    pub fn apply<B>(&mut self, ragdoll: &Ragdoll, backend: &mut B) -> usize
    where
        B: SimulationBackend + ?Sized,
    {
        let mut applied = 0;
        for command in self.commands.drain(..) {
            let handle = match ragdoll.handle(command.part()) {
                Some(handle) if backend.contains_body(handle) => handle,
                _ => {
                    warn!("missing live handle for '{}', write skipped", command.part());
                    continue;
                }
            };

            match command {
                BodyCommand::SetMotionMode { mode, .. } => backend.set_motion_mode(handle, mode),
                BodyCommand::SetTranslation { translation, .. } => {
                    backend.set_translation(handle, translation)
                }
                BodyCommand::SetRotation { rotation, .. } => backend.set_rotation(handle, rotation),
                BodyCommand::SetLinearVelocity { velocity, .. } => {
                    backend.set_linear_velocity(handle, velocity)
                }
                BodyCommand::SetAngularVelocity { velocity, .. } => {
                    backend.set_angular_velocity(handle, velocity)
                }
            }
            applied += 1;
        }
        applied
    }
}
