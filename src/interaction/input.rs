//! Pointer, ray and camera primitives fed to the drag controller by the host.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Identifies one pointer (mouse, pen, or a single touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointerId(pub u32);

impl PointerId {
    /// The mouse on a desktop host.
    pub const PRIMARY: PointerId = PointerId(0);
}

/// Why every in-progress drag must end now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    PointerLeft,
    FocusLost,
    /// A modifier (camera orbit, ...) claimed the pointer.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Plane the grabbed part moves in: through the part, facing the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPlane {
    pub point: Vec3,
    /// Unit length; the depth axis.
    pub normal: Vec3,
}

impl DragPlane {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
        }
    }

    /// Point where `ray` crosses the plane, or `None` when it runs parallel or points away.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t < 0.0 {
            return None;
        }
        Some(ray.at(t))
    }

    /// Signed distance of `point` along the normal.
    pub fn depth_of(&self, point: Vec3) -> f32 {
        (point - self.point).dot(self.normal)
    }
}

/// Pinhole camera that turns normalized pointer coordinates into world rays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub aspect: f32,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(-8.0, 4.0, 8.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 50f32.to_radians(),
            aspect: 16.0 / 9.0,
        }
    }
}

impl ViewCamera {
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Ray through `ndc`, where `(-1, -1)` is bottom-left and `(1, 1)` top-right.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect;

        let direction = forward + right * (ndc.x * half_width) + up * (ndc.y * half_height);
        Ray::new(self.position, direction)
    }

    /// Normalized coordinates of a world point, or `None` when it is behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or_zero();
        let up = right.cross(forward);
        let to_point = point - self.position;
        let depth = to_point.dot(forward);
        if depth <= 1e-6 {
            return None;
        }
        let half_height = (self.fov_y * 0.5).tan();
        let half_width = half_height * self.aspect;
        Some(Vec2::new(
            to_point.dot(right) / depth / half_width,
            to_point.dot(up) / depth / half_height,
        ))
    }
}
