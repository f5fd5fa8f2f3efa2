//! Global configuration constants and tunables for the ragdoll playground.

use serde::{Deserialize, Serialize};

/// Gravity applied by the sandbox backend (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Speed (units/sec) at which a drag turns into an immediate throw.
pub const DEFAULT_MAX_VELOCITY: f32 = 20.0;

/// Estimated speed below which a release applies no throw impulse.
pub const DEFAULT_RELEASE_THRESHOLD: f32 = 0.5;

/// Multiplier applied to the velocity estimate on an ordinary release.
pub const DEFAULT_VELOCITY_AMPLIFIER: f32 = 1.5;

/// Exponential smoothing factor for the per-tick velocity samples.
pub const DEFAULT_VELOCITY_SMOOTHING: f32 = 0.35;

/// Positional smoothing toward the drag target. `1.0` moves straight to it.
pub const DEFAULT_POSITION_SMOOTHING: f32 = 1.0;

/// Lower bound on the tick delta used for velocity estimation (seconds).
pub const DEFAULT_MIN_DELTA: f32 = 1.0 / 240.0;

/// Linear damping of every body part.
pub const DEFAULT_LINEAR_DAMPING: f32 = 2.0;

/// Angular damping of every body part.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 3.0;

/// Contact friction of every body part.
pub const DEFAULT_FRICTION: f32 = 1.0;

/// Stiffness of soft spherical joints.
pub const DEFAULT_JOINT_STIFFNESS: f32 = 100.0;

/// Damping of soft spherical joints.
pub const DEFAULT_JOINT_DAMPING: f32 = 10.0;

/// Frame budget used by the host wrapper before it warns (milliseconds).
pub const DEFAULT_FRAME_BUDGET_MS: f32 = 16.0;

/// Tunables of the drag/throw controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub max_velocity: f32,
    pub release_threshold: f32,
    pub velocity_amplifier: f32,
    pub smoothing: f32,
    pub position_smoothing: f32,
    pub min_delta: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            max_velocity: DEFAULT_MAX_VELOCITY,
            release_threshold: DEFAULT_RELEASE_THRESHOLD,
            velocity_amplifier: DEFAULT_VELOCITY_AMPLIFIER,
            smoothing: DEFAULT_VELOCITY_SMOOTHING,
            position_smoothing: DEFAULT_POSITION_SMOOTHING,
            min_delta: DEFAULT_MIN_DELTA,
        }
    }
}

impl DragConfig {
    /// Returns a copy with smoothing factors in `(0, 1]`, a positive speed cap
    /// and non-negative thresholds.
    pub fn validated(self) -> Self {
        let unit = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 {
                value.min(1.0)
            } else {
                fallback
            }
        };

        Self {
            max_velocity: if self.max_velocity.is_finite() && self.max_velocity > 0.0 {
                self.max_velocity
            } else {
                DEFAULT_MAX_VELOCITY
            },
            release_threshold: self.release_threshold.max(0.0),
            velocity_amplifier: self.velocity_amplifier.max(0.0),
            smoothing: unit(self.smoothing, DEFAULT_VELOCITY_SMOOTHING),
            position_smoothing: unit(self.position_smoothing, DEFAULT_POSITION_SMOOTHING),
            min_delta: if self.min_delta > 0.0 {
                self.min_delta
            } else {
                DEFAULT_MIN_DELTA
            },
        }
    }

    pub fn with_max_velocity(mut self, max_velocity: f32) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_position_smoothing(mut self, position_smoothing: f32) -> Self {
        self.position_smoothing = position_smoothing;
        self
    }
}

/// Damping and friction shared by every declared body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDefaults {
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
}

impl Default for BodyDefaults {
    fn default() -> Self {
        Self {
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            friction: DEFAULT_FRICTION,
        }
    }
}

/// Softness given to spherical joints that do not carry their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointDefaults {
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for JointDefaults {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_JOINT_STIFFNESS,
            damping: DEFAULT_JOINT_DAMPING,
        }
    }
}

/// Options read once by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Keep parts flagged as optional (forearms, hands, ...).
    pub include_extremities: bool,
    /// Apply [`JointDefaults`] to spherical joints without explicit compliance.
    pub soft_joints: bool,
    pub bodies: BodyDefaults,
    pub joints: JointDefaults,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            include_extremities: true,
            soft_joints: true,
            bodies: BodyDefaults::default(),
            joints: JointDefaults::default(),
        }
    }
}

impl AssemblyConfig {
    pub fn with_extremities(mut self, include: bool) -> Self {
        self.include_extremities = include;
        self
    }

    pub fn with_soft_joints(mut self, soft: bool) -> Self {
        self.soft_joints = soft;
        self
    }
}
