//! Utility helpers: generational arena, math extensions and logging.

pub mod allocator;
pub mod logging;
pub mod math;

pub use allocator::{Arena, SlotId};
pub use math::*;
