//! Frame pacing

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::{MAX_FRAME_DT, TARGET_FPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Sleep to the frame rate and measure real deltas
    Realtime,
    /// Report a constant delta without sleeping (headless runs, tests)
    Fixed,
}

/// Hands out one frame delta per call, capped at the target rate
#[derive(Debug, Clone)]
pub struct FramePacer {
    mode: Mode,
    frame: Duration,
    last: Option<Instant>,
    frames: u64,
}

impl FramePacer {
    /// Wall-clock pacing at `fps` (at most 60)
    pub fn realtime(fps: u32) -> Self {
        Self::with_mode(Mode::Realtime, fps)
    }

    /// Constant `1/fps` steps, as fast as the caller can consume them
    pub fn fixed(fps: u32) -> Self {
        Self::with_mode(Mode::Fixed, fps)
    }

    fn with_mode(mode: Mode, fps: u32) -> Self {
        let fps = fps.clamp(1, TARGET_FPS);
        Self {
            mode,
            frame: Duration::from_secs_f64(1.0 / f64::from(fps)),
            last: None,
            frames: 0,
        }
    }

    /// Target frame length in seconds
    pub fn frame_secs(&self) -> f32 {
        self.frame.as_secs_f32()
    }

    /// Frames handed out so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Wait for the next frame and return its delta in seconds
    ///
    /// Deltas are clamped to `MAX_FRAME_DT` so a stall (debugger, suspended
    /// process) never turns into one giant step.
    pub fn next_dt(&mut self) -> f32 {
        self.frames += 1;
        match self.mode {
            Mode::Fixed => self.frame_secs(),
            Mode::Realtime => {
                let now = match self.last {
                    Some(last) => {
                        let deadline = last + self.frame;
                        let now = Instant::now();
                        if now < deadline {
                            thread::sleep(deadline - now);
                        }
                        Instant::now()
                    }
                    None => Instant::now(),
                };
                let dt = self
                    .last
                    .map(|last| now.duration_since(last).as_secs_f32())
                    .unwrap_or_else(|| self.frame_secs());
                self.last = Some(now);
                dt.min(MAX_FRAME_DT)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_pacer_steps_at_sixty() {
        let mut pacer = FramePacer::fixed(144);
        let dt = pacer.next_dt();
        assert!((dt - 1.0 / 60.0).abs() < 1e-6);
        pacer.next_dt();
        assert_eq!(pacer.frames(), 2);
    }

    #[test]
    fn test_realtime_pacer_waits_for_frame() {
        let mut pacer = FramePacer::realtime(60);
        pacer.next_dt();
        let start = Instant::now();
        let dt = pacer.next_dt();
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert!(dt > 0.0 && dt <= MAX_FRAME_DT);
    }
}
