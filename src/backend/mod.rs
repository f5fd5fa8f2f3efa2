//! Seam between the ragdoll core and the physics engine that simulates it.
//!
//! The core never integrates motion or detects collisions. It declares bodies
//! and joints once, switches motion modes, and writes poses and velocities;
//! everything else belongs to the engine behind [`SimulationBackend`].

pub mod sandbox;

pub use sandbox::SandboxBackend;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::{
    core::{joint::Joint, part::PartId, types::MotionMode, types::Transform},
    interaction::input::Ray,
    utils::allocator::SlotId,
};

/// Live rigid body owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub SlotId);

/// Live joint owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointHandle(pub SlotId);

/// Everything the engine needs to create one body part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyDesc {
    pub part: PartId,
    /// Half-extents of the box collider.
    pub half_extents: Vec3,
    pub transform: Transform,
    pub mode: MotionMode,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
}

/// Closest body crossed by a pick ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub body: BodyHandle,
    pub point: Vec3,
    pub distance: f32,
}

/// Operations the core consumes from a physics engine.
///
/// Writes to a handle the engine does not know are ignored; reads return `None`.
pub trait SimulationBackend {
    fn name(&self) -> &str;

    fn create_rigid_body(&mut self, desc: &RigidBodyDesc) -> BodyHandle;

    /// Joins two bodies. `joint.anchor_on_a` is local to `body_a`, `anchor_on_b` to `body_b`.
    fn create_joint(&mut self, joint: &Joint, body_a: BodyHandle, body_b: BodyHandle)
        -> JointHandle;

    fn contains_body(&self, handle: BodyHandle) -> bool;

    fn set_motion_mode(&mut self, handle: BodyHandle, mode: MotionMode);
    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3);
    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat);
    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3);
    fn set_angular_velocity(&mut self, handle: BodyHandle, velocity: Vec3);

    fn motion_mode(&self, handle: BodyHandle) -> Option<MotionMode>;
    fn translation(&self, handle: BodyHandle) -> Option<Vec3>;
    fn rotation(&self, handle: BodyHandle) -> Option<Quat>;
    fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3>;
    fn angular_velocity(&self, handle: BodyHandle) -> Option<Vec3>;

    /// Nearest body hit by `ray` within `max_distance`. Engines without queries return `None`.
    fn cast_ray(&self, _ray: &Ray, _max_distance: f32) -> Option<RayHit> {
        None
    }

    /// Advances the simulation once. Called after the tick's writes were applied.
    fn step(&mut self, _dt: f32) {}
}
