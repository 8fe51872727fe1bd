//! Frame pacing for the tick loop.
//!
//! [`FrameTicker`] plays the role of the host's per-frame callback; the
//! [`FrameClock`] supplies the millisecond timestamps passed to each frame.
//! Both run on tokio time, so tests can pause and advance the clock.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Monotonic millisecond timestamps relative to the page's creation.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    epoch: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-rate frame source. A stalled page skips missed frames rather than
/// bursting them; the elapsed time is picked up by the next frame's `dt`.
pub struct FrameTicker {
    interval: Interval,
}

impl FrameTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub async fn next_frame(&mut self) {
        self.interval.tick().await;
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}
