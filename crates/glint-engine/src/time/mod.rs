//! Frame timing.
//!
//! One `FrameClock` drives the render loop:
//! - `tick()` once per presented frame yields a `FrameTime`
//! - `next_deadline()` tells the runtime when the next frame is due when
//!   pacing is enabled

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
