//! Per-part grab, drag and throw state machine.
//!
//! The controller never touches the engine. Every call reads live state through
//! [`LiveBodies`] and appends its writes to a [`CommandBuffer`], which the host
//! applies before stepping the simulation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use glam::{Vec2, Vec3};
use log::{debug, warn};

use super::{
    commands::CommandBuffer,
    input::{CancelReason, DragPlane, PointerId, ViewCamera},
    session::{CursorHint, DragDebug, DragEvent, DragSession, DragState, GrabOutcome},
};
use crate::{
    config::DragConfig,
    core::{part::PartId, types::MotionMode},
    utils::math::{clamp_length, lerp, project_onto_plane},
};

/// Read access to the live bodies the controller drives.
pub trait LiveBodies {
    fn translation(&self, part: &PartId) -> Option<Vec3>;
    fn motion_mode(&self, part: &PartId) -> Option<MotionMode>;
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    config: DragConfig,
    sessions: BTreeMap<PartId, DragSession>,
    /// Part each pointer is over.
    hovered: BTreeMap<PointerId, PartId>,
    pointers: HashMap<PointerId, Vec2>,
    suppressed: bool,
    events: Vec<DragEvent>,
}

impl DragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config: config.validated(),
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Reserves the pointer for something else. Turning it on ends every drag.
    pub fn set_suppressed(&mut self, suppressed: bool, out: &mut CommandBuffer) {
        if suppressed && !self.suppressed {
            self.cancel(CancelReason::Suppressed, out);
        }
        self.suppressed = suppressed;
    }

    pub fn pointer_over(&mut self, pointer: PointerId, part: &PartId) {
        if self.hovered.insert(pointer, part.clone()).as_ref() != Some(part) {
            debug!("pointer {} over '{part}'", pointer.0);
        }
    }

    /// Clears the hover of `pointer` if it is still on `part`.
    pub fn pointer_out(&mut self, pointer: PointerId, part: &PartId) {
        if self.hovered.get(&pointer) == Some(part) {
            self.hovered.remove(&pointer);
        }
    }

    pub fn hovered_part(&self, pointer: PointerId) -> Option<&PartId> {
        self.hovered.get(&pointer)
    }

    /// True while at least one pointer is over `part`.
    pub fn is_hovered(&self, part: &PartId) -> bool {
        self.hovered.values().any(|hovered| hovered == part)
    }

    /// Records where `pointer` is, in normalized device coordinates.
    pub fn pointer_move(&mut self, pointer: PointerId, ndc: Vec2) {
        self.pointers.insert(pointer, ndc);
    }

    /// Starts dragging `part` with `pointer`, which the host hit-tested onto it.
    pub fn pointer_down<L>(
        &mut self,
        pointer: PointerId,
        ndc: Vec2,
        part: &PartId,
        camera: &ViewCamera,
        live: &L,
        out: &mut CommandBuffer,
    ) -> GrabOutcome
    where
        L: LiveBodies + ?Sized,
    {
        self.pointer_move(pointer, ndc);

        if self.suppressed {
            return GrabOutcome::Suppressed;
        }
        if self.sessions.contains_key(part) {
            return GrabOutcome::AlreadyDragging;
        }

        let (position, mode) = match (live.translation(part), live.motion_mode(part)) {
            (Some(position), Some(mode)) => (position, mode),
            _ => {
                warn!("grab on '{part}' skipped: no live body");
                return GrabOutcome::MissingHandle;
            }
        };
        if mode == MotionMode::Anchored {
            return GrabOutcome::NotDraggable;
        }

        let plane = DragPlane::new(position, camera.forward());
        let Some(grab_point) = plane.intersect(&camera.ray_through(ndc)) else {
            return GrabOutcome::NoIntersection;
        };

        self.hovered.insert(pointer, part.clone());
        self.sessions.insert(
            part.clone(),
            DragSession::new(part.clone(), pointer, position - grab_point),
        );
        out.set_mode(part, MotionMode::UserControlled);
        self.events.push(DragEvent::Grabbed {
            part: part.clone(),
            pointer,
        });
        debug!("grab '{part}' with pointer {}", pointer.0);

        GrabOutcome::Started
    }

    /// Ends every session held by `pointer`.
    pub fn pointer_up(&mut self, pointer: PointerId, out: &mut CommandBuffer) {
        let owned: Vec<PartId> = self
            .sessions
            .values()
            .filter(|session| session.pointer == pointer)
            .map(|session| session.part.clone())
            .collect();

        for part in owned {
            if let Some(session) = self.sessions.remove(&part) {
                self.release(session, out);
            }
        }
        self.pointers.remove(&pointer);
    }

    /// Global cancel: every session ends as a release with its last estimate.
    pub fn cancel(&mut self, reason: CancelReason, out: &mut CommandBuffer) {
        if self.sessions.is_empty() {
            return;
        }
        debug!("cancel {} drag(s): {reason:?}", self.sessions.len());
        let sessions = std::mem::take(&mut self.sessions);
        for session in sessions.into_values() {
            self.release(session, out);
        }
    }

    /// Per-tick update of every live session.
    pub fn tick<L>(&mut self, dt: f32, camera: &ViewCamera, live: &L, out: &mut CommandBuffer)
    where
        L: LiveBodies + ?Sized,
    {
        let config = self.config;
        let dt = dt.max(config.min_delta);
        let normal = camera.forward();
        let mut vanished = Vec::new();

        for (part, session) in self.sessions.iter_mut() {
            let Some(current) = live.translation(part) else {
                vanished.push(part.clone());
                continue;
            };
            if session.velocity_cap_reached {
                continue;
            }
            let Some(&ndc) = self.pointers.get(&session.pointer) else {
                continue;
            };

            let plane = DragPlane::new(current, normal);
            let Some(hit) = plane.intersect(&camera.ray_through(ndc)) else {
                continue;
            };
            let target = hit + session.pointer_offset;

            let sample = project_onto_plane((target - current) / dt, plane.normal);
            session.last_sample = sample;
            session.velocity_estimate = lerp(session.velocity_estimate, sample, config.smoothing);

            let estimate_over = session.velocity_estimate.length() >= config.max_velocity;
            if estimate_over || sample.length() >= config.max_velocity {
                let source = if estimate_over {
                    session.velocity_estimate
                } else {
                    sample
                };
                let velocity = clamp_length(source, config.max_velocity);
                session.velocity_estimate = velocity;
                session.velocity_cap_reached = true;

                out.set_mode(part, MotionMode::Simulated);
                out.set_linear_velocity(part, velocity);
                self.events.push(DragEvent::VelocityCapped {
                    part: part.clone(),
                    velocity,
                });
                debug!("'{part}' hit the speed cap, thrown at {velocity}");
                continue;
            }

            let step = project_onto_plane(
                (target - current) * config.position_smoothing,
                plane.normal,
            );
            out.set_translation(part, current + step);
        }

        for part in vanished {
            warn!("'{part}' lost its live body mid-drag, session dropped");
            self.sessions.remove(&part);
        }
    }

    /// Drops the session on `part` without writing anything.
    pub fn abandon(&mut self, part: &PartId) -> bool {
        self.sessions.remove(part).is_some()
    }

    pub fn state(&self, part: &PartId) -> DragState {
        match self.sessions.get(part) {
            Some(session) => session.state(),
            None if self.is_hovered(part) => DragState::Hovering,
            None => DragState::Idle,
        }
    }

    pub fn session(&self, part: &PartId) -> Option<&DragSession> {
        self.sessions.get(part)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &DragSession> + '_ {
        self.sessions.values()
    }

    pub fn is_dragging(&self, part: &PartId) -> bool {
        self.state(part) == DragState::Dragging
    }

    /// One entry per part that is hovered or held.
    pub fn debug_signals(&self) -> Vec<DragDebug> {
        let parts: BTreeSet<&PartId> = self.sessions.keys().chain(self.hovered.values()).collect();
        parts
            .into_iter()
            .map(|part| {
                let speed = self
                    .sessions
                    .get(part)
                    .map_or(0.0, |session| session.velocity_estimate.length());
                DragDebug {
                    part: part.clone(),
                    state: self.state(part),
                    velocity_fraction: velocity_fraction(speed, self.config.max_velocity),
                }
            })
            .collect()
    }

    pub fn cursor_hint(&self) -> CursorHint {
        if self.sessions.values().any(|s| !s.velocity_cap_reached) {
            CursorHint::Grabbing
        } else if !self.hovered.is_empty() {
            CursorHint::Grab
        } else {
            CursorHint::Default
        }
    }

    /// Transitions since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<DragEvent> {
        std::mem::take(&mut self.events)
    }

    fn release(&mut self, session: DragSession, out: &mut CommandBuffer) {
        let part = session.part;
        // Already simulated since the cap fired.
        if session.velocity_cap_reached {
            return;
        }

        out.set_mode(&part, MotionMode::Simulated);
        let estimate = session.velocity_estimate;
        let throw = if estimate.length() > self.config.release_threshold {
            let velocity = estimate * self.config.velocity_amplifier;
            out.set_linear_velocity(&part, velocity);
            Some(velocity)
        } else {
            None
        };
        debug!("release '{part}', throw {throw:?}");
        self.events.push(DragEvent::Released { part, throw });
    }
}

fn velocity_fraction(speed: f32, max_velocity: f32) -> f32 {
    if max_velocity <= 0.0 {
        1.0
    } else {
        (speed / max_velocity).clamp(0.0, 1.0)
    }
}
