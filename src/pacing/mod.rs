//! Frame pacing: hold the render loop to a target rate while pumping host
//! input, and measure the rate actually achieved.

mod clock;
mod frame_pacer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use frame_pacer::{FPS_WINDOW, FramePacer, OVERSHOOT_SMOOTHING, TimingStrategy};
