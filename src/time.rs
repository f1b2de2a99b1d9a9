//! Variable-timestep frame clock.
//!
//! `draw_web()` calls at ~60fps with variable delta. FrameClock turns
//! wall-clock timestamps into an elapsed-seconds value per frame, clamped
//! so a backgrounded tab cannot dump minutes of income into one step.

/// Longest step (seconds) a single frame may advance the game.
pub const MAX_FRAME_DT: f64 = 0.25;

pub struct FrameClock {
    /// Timestamp of the last update (ms), None if first frame
    last_timestamp: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
        }
    }

    /// Feed wall-clock timestamp (ms). Returns elapsed seconds in
    /// `[0, MAX_FRAME_DT]`; the first frame returns 0.
    pub fn delta(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_timestamp {
            Some(prev) => ((now_ms - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);
        dt
    }

    pub fn last(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Forget the previous frame (after a load or reset).
    pub fn restart(&mut self) {
        self.last_timestamp = None;
    }
}
