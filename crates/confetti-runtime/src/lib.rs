//! Confetti Runtime - drives one particle effect per scene
//!
//! - `FrameClock` — priming/running frame clock with a delta clamp
//! - `SceneDriver` — owns a scene and its active effect, one-shot or looping
//! - `FrameStats` — per-frame summary for hosts and tests

mod clock;
mod driver;

pub use clock::{FrameClock, MAX_FRAME_DELTA};
pub use driver::{FrameStats, PlaybackMode, SceneDriver, GRACE_PERIOD};
