//! Pointer interaction: input primitives, the drag/throw controller, the
//! writes it produces and the reset coordinator.

pub mod commands;
pub mod controller;
pub mod input;
pub mod reset;
pub mod session;

pub use commands::{BodyCommand, CommandBuffer};
pub use controller::{DragController, LiveBodies};
pub use input::{CancelReason, DragPlane, PointerId, Ray, ViewCamera};
pub use reset::ResetCoordinator;
pub use session::{CursorHint, DragDebug, DragEvent, DragSession, DragState, GrabOutcome};
