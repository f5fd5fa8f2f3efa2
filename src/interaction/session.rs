use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::input::PointerId;
use crate::core::part::PartId;

/// Observable interaction state of one part.
///
/// A plain release has no lasting state: the session ends and the part goes
/// back to `Idle` (or `Hovering`) immediately, reported as [`DragEvent::Released`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DragState {
    #[default]
    Idle,
    Hovering,
    Dragging,
    /// Thrown at the speed cap while the pointer is still held.
    VelocityCapped,
}

/// In-progress grab of one part by one pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub part: PartId,
    pub pointer: PointerId,
    /// Part position minus the grab point, fixed for the whole session.
    pub pointer_offset: Vec3,
    pub velocity_estimate: Vec3,
    /// Most recent unsmoothed velocity sample.
    pub last_sample: Vec3,
    pub velocity_cap_reached: bool,
}

impl DragSession {
    pub fn new(part: PartId, pointer: PointerId, pointer_offset: Vec3) -> Self {
        Self {
            part,
            pointer,
            pointer_offset,
            velocity_estimate: Vec3::ZERO,
            last_sample: Vec3::ZERO,
            velocity_cap_reached: false,
        }
    }

    pub fn state(&self) -> DragState {
        if self.velocity_cap_reached {
            DragState::VelocityCapped
        } else {
            DragState::Dragging
        }
    }
}

/// Transitions reported by the controller, drained by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    Grabbed {
        part: PartId,
        pointer: PointerId,
    },
    /// Handed back to the simulation. `throw` is the velocity applied, if any.
    Released {
        part: PartId,
        throw: Option<Vec3>,
    },
    /// Thrown at the speed cap before the pointer was released.
    VelocityCapped {
        part: PartId,
        velocity: Vec3,
    },
}

impl DragEvent {
    pub fn part(&self) -> &PartId {
        match self {
            Self::Grabbed { part, .. }
            | Self::Released { part, .. }
            | Self::VelocityCapped { part, .. } => part,
        }
    }
}

/// Result of a pointer-down on a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOutcome {
    Started,
    /// Pointer input is reserved (camera control modifier held).
    Suppressed,
    /// The part already has a session; ignored until it is released.
    AlreadyDragging,
    /// The part has no live body yet.
    MissingHandle,
    /// World anchors cannot be grabbed.
    NotDraggable,
    /// The pointer ray never reaches the part's drag plane.
    NoIntersection,
}

impl GrabOutcome {
    pub fn started(self) -> bool {
        matches!(self, GrabOutcome::Started)
    }
}

/// Read-only signal for optional on-screen display.
#[derive(Debug, Clone, PartialEq)]
pub struct DragDebug {
    pub part: PartId,
    pub state: DragState,
    /// `|velocity_estimate| / max_velocity`, clamped to `[0, 1]`.
    pub velocity_fraction: f32,
}

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Grab,
    Grabbing,
}
