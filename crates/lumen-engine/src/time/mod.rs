//! Time subsystem.
//!
//! Frame timing decoupled from the platform: backends hand out a [`Clock`],
//! the application drives one [`FrameTimer`] per loop.

mod clock;
mod frame_timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use frame_timer::{FrameTime, FrameTimer, MIN_FRAME_DELTA};
