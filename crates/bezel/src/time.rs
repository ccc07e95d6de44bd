//! Frame timing.
//!
//! [`FrameClock`] is ticked once per redraw by the window. Its delta feeds
//! real-time animation and keyboard nudges; its smoothed FPS feeds the panel
//! and diagnostics.

use std::time::{Duration, Instant};

/// Weight of the newest frame in the smoothed FPS.
const FPS_SMOOTHING: f32 = 0.1;

/// Frame timing, updated at the start of each frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    frame_count: u64,
    smoothed_fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            frame_count: 0,
            smoothed_fps: 0.0,
        }
    }

    /// Start a new frame. Returns the previous frame's duration in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> f32 {
        self.delta = now.saturating_duration_since(self.frame_start);
        self.frame_start = now;
        self.frame_count += 1;

        let secs = self.delta.as_secs_f32();
        if secs > 0.0 {
            let fps = 1.0 / secs;
            self.smoothed_fps = if self.smoothed_fps == 0.0 {
                fps
            } else {
                self.smoothed_fps + (fps - self.smoothed_fps) * FPS_SMOOTHING
            };
        }
        secs
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Seconds since the clock was created.
    pub fn uptime_secs(&self) -> f32 {
        self.startup.elapsed().as_secs_f32()
    }

    /// Number of ticks so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// FPS, exponentially smoothed over recent frames.
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
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

    #[test]
    fn tick_measures_delta_and_counts() {
        let mut clock = FrameClock::new();
        let start = clock.frame_start;
        let dt = clock.tick_at(start + Duration::from_millis(20));
        assert!((dt - 0.02).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
        assert!((clock.fps() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn fps_is_smoothed() {
        let mut clock = FrameClock::new();
        let start = clock.frame_start;
        clock.tick_at(start + Duration::from_millis(10));
        clock.tick_at(start + Duration::from_millis(30));
        // 100 fps, then one 50 fps frame pulls it down by a tenth of the gap.
        assert!((clock.fps() - 95.0).abs() < 1e-2);
    }

    #[test]
    fn zero_delta_keeps_previous_fps() {
        let mut clock = FrameClock::new();
        let start = clock.frame_start;
        clock.tick_at(start + Duration::from_millis(10));
        clock.tick_at(start + Duration::from_millis(10));
        assert!((clock.fps() - 100.0).abs() < 1e-2);
        assert_eq!(clock.delta_secs(), 0.0);
    }
}
