//! Frame clock driving the simulation.
//!
//! The animation loop reads time as a [`Duration`] since start so deadlines
//! compare exactly. The clock runs in one of two modes:
//!
//! - **real time**: [`FrameClock::tick`] samples `Instant::now()`;
//! - **manual**: [`FrameClock::tick_by`] advances by a given step, which is
//!   what tests and headless runs use.
//!
//! # Example
//!
//! ```ignore
//! use ornament_burst::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//! // In your frame loop:
//! let now = clock.tick();
//! sim.frame(now);
//! ```

use std::time::{Duration, Instant};

/// How often the FPS estimate refreshes.
const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Elapsed time, per-frame delta, frame count and FPS.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Real-time origin; `None` for a manual clock.
    origin: Option<Instant>,
    elapsed: Duration,
    delta: Duration,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_window_start: Duration,
    paused: bool,
    /// Real time spent paused, subtracted from elapsed.
    paused_total: Duration,
    paused_at: Option<Instant>,
}

impl FrameClock {
    /// Real-time clock starting now.
    pub fn new() -> Self {
        Self::with_origin(Some(Instant::now()))
    }

    /// Clock that only moves through [`tick_by`](Self::tick_by).
    pub fn manual() -> Self {
        Self::with_origin(None)
    }

    fn with_origin(origin: Option<Instant>) -> Self {
        Self {
            origin,
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_window_start: Duration::ZERO,
            paused: false,
            paused_total: Duration::ZERO,
            paused_at: None,
        }
    }

    /// Sample real time. Returns the new elapsed time.
    ///
    /// A manual clock is left unchanged apart from the frame count.
    pub fn tick(&mut self) -> Duration {
        let now_elapsed = match self.origin {
            Some(origin) if !self.paused => origin.elapsed().saturating_sub(self.paused_total),
            _ => self.elapsed,
        };
        self.advance_to(now_elapsed)
    }

    /// Advance by a fixed step. Returns the new elapsed time.
    pub fn tick_by(&mut self, step: Duration) -> Duration {
        let target = if self.paused { self.elapsed } else { self.elapsed + step };
        self.advance_to(target)
    }

    fn advance_to(&mut self, elapsed: Duration) -> Duration {
        self.delta = elapsed.saturating_sub(self.elapsed);
        self.elapsed = elapsed.max(self.elapsed);
        self.frame_count += 1;

        let window = self.elapsed - self.fps_window_start;
        if window >= FPS_WINDOW {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_window_start = self.elapsed;
        }
        self.elapsed
    }

    /// Elapsed time since start, excluding pauses.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed seconds as f32.
    #[inline]
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Time between the last two ticks.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last measurement window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze elapsed time. Deadlines stop counting down while paused.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.paused_at = self.origin.map(|_| Instant::now());
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            if let Some(at) = self.paused_at.take() {
                self.paused_total += at.elapsed();
            }
            self.paused = false;
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
