//! Frame pacing
//!
//! The web build is driven by `requestAnimationFrame` and converts frame
//! deltas into fixed ticks with [`FixedStep`]. The native build sleeps to the
//! target rate with [`FrameLimiter`].

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted before clamping (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps,
        }
    }

    /// Feed a frame delta; returns how many fixed ticks to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        // Drop the backlog instead of spiralling
        if ticks == self.max_substeps {
            self.accumulator = self.accumulator.min(self.dt);
        }
        ticks
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::{FrameLimiter, compute_sleep};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::thread;
    use std::time::{Duration, Instant};

    /// Time left to sleep in the current frame
    pub fn compute_sleep(elapsed: Duration, target: Duration) -> Duration {
        target.saturating_sub(elapsed)
    }

    /// Blocking limiter that paces a loop to a fixed frame rate
    #[derive(Debug)]
    pub struct FrameLimiter {
        target: Duration,
        last: Instant,
    }

    impl FrameLimiter {
        pub fn new(fps: u32) -> Self {
            Self {
                target: Duration::from_secs(1) / fps.max(1),
                last: Instant::now(),
            }
        }

        pub fn target(&self) -> Duration {
            self.target
        }

        /// Sleep out the remainder of the frame and start the next one
        pub fn wait(&mut self) {
            let sleep = compute_sleep(self.last.elapsed(), self.target);
            if sleep > Duration::ZERO {
                thread::sleep(sleep);
            }
            self.last = Instant::now();
        }
    }
}
