//! Core data types: body parts, joints, transforms and motion modes.

pub mod joint;
pub mod part;
pub mod types;

pub use joint::{AngularLimits, AxisRange, Joint, JointCompliance};
pub use part::{BodyPart, JointKind, PartId, PartRole};
pub use types::{MotionMode, Transform, Velocity};
