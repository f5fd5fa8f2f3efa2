//! In-memory reference engine.
//!
//! Stores bodies and joints in generational arenas, answers box ray casts and
//! integrates simulated bodies under gravity with damping. It does not detect
//! contacts or solve joints; hosts that need that plug a full engine in behind
//! [`SimulationBackend`].

use glam::{Quat, Vec3};
use log::debug;

use super::{BodyHandle, JointHandle, RayHit, RigidBodyDesc, SimulationBackend};
use crate::{
    config::DEFAULT_GRAVITY,
    core::{
        joint::Joint,
        part::PartId,
        types::{MotionMode, Transform, Velocity},
    },
    interaction::input::Ray,
    utils::allocator::Arena,
};

#[derive(Debug, Clone)]
pub struct SandboxBody {
    pub part: PartId,
    pub transform: Transform,
    pub velocity: Velocity,
    pub mode: MotionMode,
    pub half_extents: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
}

#[derive(Debug, Clone)]
pub struct SandboxJoint {
    pub joint: Joint,
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
}

pub struct SandboxBackend {
    bodies: Arena<SandboxBody>,
    joints: Arena<SandboxJoint>,
    pub gravity: Vec3,
    mode_switches: usize,
}

impl Default for SandboxBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxBackend {
    pub fn new() -> Self {
        Self {
            bodies: Arena::new(),
            joints: Arena::new(),
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            mode_switches: 0,
        }
    }

    pub fn without_gravity() -> Self {
        Self {
            gravity: Vec3::ZERO,
            ..Self::new()
        }
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&SandboxBody> {
        self.bodies.get(handle.0)
    }

    pub fn joints(&self) -> impl Iterator<Item = &SandboxJoint> + '_ {
        self.joints.iter().map(|(_, joint)| joint)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Number of `set_motion_mode` calls that actually changed a mode.
    pub fn mode_switches(&self) -> usize {
        self.mode_switches
    }

    /// Drops a body, as an engine would when a part is despawned.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies.remove(handle.0).is_some()
    }

    fn integrate(body: &mut SandboxBody, gravity: Vec3, dt: f32) {
        body.velocity.linear += gravity * dt;
        body.velocity.linear *= (1.0 - body.linear_damping * dt).max(0.0);
        body.velocity.angular *= (1.0 - body.angular_damping * dt).max(0.0);

        body.transform.position += body.velocity.linear * dt;

        let omega = body.velocity.angular.length();
        if omega > 1e-6 {
            let delta = Quat::from_axis_angle(body.velocity.angular / omega, omega * dt);
            body.transform.rotation = (delta * body.transform.rotation).normalize();
        }
    }

    /// Slab test in the box's local frame. Returns the entry distance along `ray`.
    fn ray_box(ray: &Ray, transform: &Transform, half_extents: Vec3, max_distance: f32) -> Option<f32> {
        let inverse = transform.rotation.inverse();
        let origin = inverse * (ray.origin - transform.position);
        let direction = inverse * ray.direction;

        let mut t_min = 0.0f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (min, max) = (-half_extents[axis], half_extents[axis]);

            if d.abs() < 1e-6 {
                if o < min || o > max {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (mut t1, mut t2) = ((min - o) * inv, (max - o) * inv);
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

impl SimulationBackend for SandboxBackend {
    fn name(&self) -> &str {
        "sandbox"
    }

    fn create_rigid_body(&mut self, desc: &RigidBodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.bodies.insert(SandboxBody {
            part: desc.part.clone(),
            transform: desc.transform,
            velocity: Velocity::default(),
            mode: desc.mode,
            half_extents: desc.half_extents,
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
            friction: desc.friction,
        }));
        debug!("sandbox: body '{}' -> {:?}", desc.part, handle);
        handle
    }

    fn create_joint(
        &mut self,
        joint: &Joint,
        body_a: BodyHandle,
        body_b: BodyHandle,
    ) -> JointHandle {
        JointHandle(self.joints.insert(SandboxJoint {
            joint: joint.clone(),
            body_a,
            body_b,
        }))
    }

    fn contains_body(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    fn set_motion_mode(&mut self, handle: BodyHandle, mode: MotionMode) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            if body.mode != mode {
                body.mode = mode;
                self.mode_switches += 1;
            }
        }
    }

    fn set_translation(&mut self, handle: BodyHandle, translation: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.transform.position = translation;
        }
    }

    fn set_rotation(&mut self, handle: BodyHandle, rotation: Quat) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.transform.rotation = rotation;
        }
    }

    fn set_linear_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.velocity.linear = velocity;
        }
    }

    fn set_angular_velocity(&mut self, handle: BodyHandle, velocity: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle.0) {
            body.velocity.angular = velocity;
        }
    }

    fn motion_mode(&self, handle: BodyHandle) -> Option<MotionMode> {
        self.bodies.get(handle.0).map(|body| body.mode)
    }

    fn translation(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|body| body.transform.position)
    }

    fn rotation(&self, handle: BodyHandle) -> Option<Quat> {
        self.bodies.get(handle.0).map(|body| body.transform.rotation)
    }

    fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|body| body.velocity.linear)
    }

    fn angular_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        self.bodies.get(handle.0).map(|body| body.velocity.angular)
    }

    fn cast_ray(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        self.bodies
            .iter()
            .filter_map(|(id, body)| {
                Self::ray_box(ray, &body.transform, body.half_extents, max_distance).map(
                    |distance| RayHit {
                        body: BodyHandle(id),
                        point: ray.at(distance),
                        distance,
                    },
                )
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let gravity = self.gravity;
        for (_, body) in self.bodies.iter_mut() {
            if body.mode == MotionMode::Simulated {
                Self::integrate(body, gravity, dt);
            }
        }
    }
}
