//! Ragdoll construction: anchor geometry, assembly from a part table, presets
//! and the spawned figure.

pub mod anchors;
pub mod assembler;
pub mod presets;
pub mod ragdoll;

pub use anchors::resolve_anchors;
pub use assembler::{RagdollAssembler, RagdollBlueprint};
pub use ragdoll::{LiveView, Ragdoll};
