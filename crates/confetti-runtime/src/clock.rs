//! Host frame clock

/// Largest delta forwarded to an effect, in seconds
pub const MAX_FRAME_DELTA: f64 = 1.0 / 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum ClockState {
    /// No frame seen yet
    Priming,
    Running { last_time: f64 },
}

/// Turns host timestamps into clamped frame deltas.
///
/// The first tick only records the zero point. After that every tick yields
/// `min(current - last, MAX_FRAME_DELTA)`, so a stall (window drag, resume
/// from sleep) never turns into one huge integration step.
#[derive(Clone, Debug)]
pub struct FrameClock {
    state: ClockState,
    /// Host time of the first tick
    start_time: f64,
    /// Sum of forwarded (clamped) deltas
    pub total_time: f64,
    /// Last forwarded delta
    pub delta_time: f64,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            state: ClockState::Priming,
            start_time: 0.0,
            total_time: 0.0,
            delta_time: 0.0,
            frames: 0,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_priming(&self) -> bool {
        self.state == ClockState::Priming
    }

    /// Ticks seen so far, priming tick included
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Host time of the priming tick
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Advance to `current_time`. Returns `None` on the priming tick, otherwise
    /// the clamped delta.
    pub fn tick(&mut self, current_time: f64) -> Option<f64> {
        self.frames += 1;
        match self.state {
            ClockState::Priming => {
                self.state = ClockState::Running {
                    last_time: current_time,
                };
                self.start_time = current_time;
                self.delta_time = 0.0;
                None
            }
            ClockState::Running { last_time } => {
                let raw = (current_time - last_time).max(0.0);
                if raw > MAX_FRAME_DELTA {
                    log::trace!("frame delta {raw:.4}s clamped to {MAX_FRAME_DELTA:.4}s");
                }
                self.state = ClockState::Running {
                    last_time: current_time,
                };
                self.delta_time = raw.min(MAX_FRAME_DELTA);
                self.total_time += self.delta_time;
                Some(self.delta_time)
            }
        }
    }

    /// Back to priming; the next tick becomes the new zero point
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
