//! Frame timing.
//!
//! A [`FrameClock`] is the single monotonic time source for the backdrop:
//! the same reading drives the step delta and entity ages, so ages can never
//! go negative.

use std::time::{Duration, Instant};

/// Monotonic clock with frame counting and periodic FPS calculation.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// Elapsed seconds at the last tick (cached for fast access).
    elapsed_secs: f32,
    /// Total ticks since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at the last FPS update.
    fps_frame_count: u64,
    /// Time of the last FPS calculation.
    fps_update_time: Instant,
    /// How often to update the FPS calculation.
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            elapsed_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance the clock one frame. Returns elapsed seconds since start.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.elapsed_secs
    }

    /// Elapsed seconds at the last tick.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Total ticks since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_clock_tick_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let elapsed = clock.tick();
        assert!(elapsed > 0.0);
        assert_eq!(clock.frame(), 1);
        assert_eq!(clock.elapsed(), elapsed);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut clock = FrameClock::new();
        let mut last = 0.0;
        for _ in 0..10 {
            let now = clock.tick();
            assert!(now >= last);
            last = now;
        }
    }
}
