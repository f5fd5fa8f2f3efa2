//! Ragdoll Playground – grab, drag and throw an articulated figure.
//!
//! The crate derives joint anchors from a rest-pose part table, wires the parts
//! into a joint tree, and runs a per-part drag/throw state machine that hands
//! bodies back and forth between the pointer and a physics engine. The engine
//! itself sits behind [`SimulationBackend`]; [`SandboxBackend`] is a small
//! in-memory reference implementation.

pub mod backend;
pub mod config;
pub mod core;
pub mod error;
pub mod interaction;
pub mod rig;
pub mod utils;

pub use glam::{Quat, Vec2, Vec3};

pub use backend::{BodyHandle, JointHandle, RayHit, RigidBodyDesc, SandboxBackend, SimulationBackend};
pub use config::{AssemblyConfig, DragConfig};
pub use crate::core::{
    AngularLimits, AxisRange, BodyPart, Joint, JointCompliance, JointKind, MotionMode, PartId,
    PartRole, Transform, Velocity,
};
pub use error::{RagdollError, Result};
pub use interaction::{
    BodyCommand, CancelReason, CommandBuffer, CursorHint, DragController, DragDebug, DragEvent,
    DragState, GrabOutcome, LiveBodies, PointerId, Ray, ResetCoordinator, ViewCamera,
};
pub use rig::{resolve_anchors, Ragdoll, RagdollAssembler, RagdollBlueprint};

use config::DEFAULT_FRAME_BUDGET_MS;
use utils::logging::{warn_if_frame_budget_exceeded, ScopedTimer};

/// Default reach of pointer picking rays.
const PICK_DISTANCE: f32 = 1000.0;

/// Host-facing wrapper owning the engine, one spawned figure, the drag
/// controller and the camera used to turn pointer coordinates into rays.
///
/// Pointer callbacks apply their writes immediately; [`tick`](Self::tick)
/// applies the controller's writes and then steps the engine.
pub struct RagdollPlayground<B: SimulationBackend> {
    backend: B,
    ragdoll: Ragdoll,
    controller: DragController,
    camera: ViewCamera,
    commands: CommandBuffer,
    frame_budget_ms: f32,
}

impl<B: SimulationBackend> RagdollPlayground<B> {
    pub fn new(blueprint: RagdollBlueprint, mut backend: B, camera: ViewCamera, drag: DragConfig) -> Self {
        let ragdoll = Ragdoll::spawn(blueprint, &mut backend);
        Self {
            backend,
            ragdoll,
            controller: DragController::new(drag),
            camera,
            commands: CommandBuffer::new(),
            frame_budget_ms: DEFAULT_FRAME_BUDGET_MS,
        }
    }

    /// Assembles `table` and spawns it.
    pub fn from_table(
        table: &[BodyPart],
        assembly: AssemblyConfig,
        backend: B,
        camera: ViewCamera,
        drag: DragConfig,
    ) -> Result<Self> {
        let blueprint = RagdollAssembler::new(assembly).assemble(table)?;
        Ok(Self::new(blueprint, backend, camera, drag))
    }

    pub fn with_frame_budget(mut self, budget_ms: f32) -> Self {
        self.frame_budget_ms = budget_ms;
        self
    }

    pub fn camera(&self) -> &ViewCamera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: ViewCamera) {
        self.camera = camera;
    }

    /// Tracks the pointer and updates hover. Returns the part under it, if any.
    pub fn pointer_move(&mut self, pointer: PointerId, ndc: Vec2) -> Option<PartId> {
        self.controller.pointer_move(pointer, ndc);

        let under = self.pick(ndc);
        let previous = self.controller.hovered_part(pointer).cloned();
        if previous != under {
            if let Some(old) = &previous {
                self.controller.pointer_out(pointer, old);
            }
            if let Some(new) = &under {
                self.controller.pointer_over(pointer, new);
            }
        }
        under
    }

    /// Grabs whatever draggable part lies under the pointer.
    pub fn pointer_down(&mut self, pointer: PointerId, ndc: Vec2) -> Option<(PartId, GrabOutcome)> {
        let part = self.pointer_move(pointer, ndc)?;
        let outcome = self.controller.pointer_down(
            pointer,
            ndc,
            &part,
            &self.camera,
            &self.ragdoll.view(&self.backend),
            &mut self.commands,
        );
        self.flush();
        Some((part, outcome))
    }

    pub fn pointer_up(&mut self, pointer: PointerId) {
        self.controller.pointer_up(pointer, &mut self.commands);
        self.flush();
    }

    /// Pointer left the canvas, focus lost, ...: every drag ends now.
    pub fn cancel(&mut self, reason: CancelReason) {
        self.controller.cancel(reason, &mut self.commands);
        self.flush();
    }

    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.controller.set_suppressed(suppressed, &mut self.commands);
        self.flush();
    }

    /// Updates every drag, applies the writes, then steps the engine.
    pub fn tick(&mut self, dt: f32) {
        let timer = ScopedTimer::new("playground::tick");
        self.controller.tick(
            dt,
            &self.camera,
            &self.ragdoll.view(&self.backend),
            &mut self.commands,
        );
        self.flush();
        self.backend.step(dt);
        warn_if_frame_budget_exceeded(timer.elapsed(), self.frame_budget_ms);
    }

    /// Back to the rest pose. Safe to call at any time, any number of times.
    pub fn reset(&mut self) -> usize {
        ResetCoordinator::reset(&self.ragdoll, &mut self.controller, &mut self.backend)
    }

    pub fn state(&self, part: &PartId) -> DragState {
        self.controller.state(part)
    }

    pub fn debug_signals(&self) -> Vec<DragDebug> {
        self.controller.debug_signals()
    }

    pub fn cursor_hint(&self) -> CursorHint {
        self.controller.cursor_hint()
    }

    pub fn drain_events(&mut self) -> Vec<DragEvent> {
        self.controller.drain_events()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn ragdoll(&self) -> &Ragdoll {
        &self.ragdoll
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    fn flush(&mut self) {
        self.commands.apply(&self.ragdoll, &mut self.backend);
    }

    /// Draggable part under `ndc`; world anchors are ignored.
    fn pick(&self, ndc: Vec2) -> Option<PartId> {
        let ray = self.camera.ray_through(ndc);
        let (part, _) = self.ragdoll.pick(&self.backend, &ray, PICK_DISTANCE)?;
        let draggable = self
            .ragdoll
            .blueprint()
            .part(&part)
            .is_some_and(|p| !p.is_anchor());
        draggable.then_some(part)
    }
}
