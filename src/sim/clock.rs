//! Monotonic simulation clock
//!
//! Time is kept as integer microseconds so repeated frame deltas accumulate
//! without float drift. All timers compare against `now_ms()` sampled once
//! per tick.

/// Monotonic clock advanced by frame deltas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimClock {
    elapsed_us: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds and return the delta actually applied (ms)
    ///
    /// Negative or NaN deltas are treated as zero so time never runs backwards.
    pub fn advance(&mut self, dt: f32) -> u64 {
        let before = self.now_ms();
        let step_us = if dt.is_finite() && dt > 0.0 {
            (f64::from(dt) * 1_000_000.0).round() as u64
        } else {
            0
        };
        self.elapsed_us += step_us;
        self.now_ms() - before
    }

    /// Advance by a whole number of milliseconds
    pub fn advance_ms(&mut self, ms: u64) {
        self.elapsed_us += ms * 1000;
    }

    /// Elapsed time in whole milliseconds
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.elapsed_us / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_hz_frames_accumulate_exactly() {
        let mut clock = SimClock::new();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        // 60 * 16667us = 1000.02ms
        assert_eq!(clock.now_ms(), 1000);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut clock = SimClock::new();
        clock.advance_ms(10);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_advance_reports_whole_ms_delta() {
        let mut clock = SimClock::new();
        assert_eq!(clock.advance(0.25), 250);
        assert_eq!(clock.now_ms(), 250);
    }
}
