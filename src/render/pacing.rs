//! Frame pacing.
//!
//! Every mode paces the same way: measure the wall time since the previous frame was presented,
//! sleep whatever is left of the target period, and never carry a deficit into the next frame.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// Monotonic time source plus the only blocking primitive the playback loop uses.
pub trait Clock: Send {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
    /// Block the worker for `d`.
    fn sleep(&self, d: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

#[derive(Debug, Default)]
struct ManualState {
    now: Duration,
    sleeps: Vec<Duration>,
}

/// Virtual clock for tests: `sleep` advances time instantly and is recorded.
///
/// Clones share state, so a test can keep a handle while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance virtual time without recording a sleep (simulates work).
    pub fn advance(&self, d: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.now += d;
        }
    }

    /// All sleeps requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.state
            .lock()
            .map(|s| s.sleeps.clone())
            .unwrap_or_default()
    }

    /// Sum of all requested sleeps.
    pub fn total_slept(&self) -> Duration {
        self.sleeps().into_iter().sum()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.state.lock().map(|s| s.now).unwrap_or_default()
    }

    fn sleep(&self, d: Duration) {
        if let Ok(mut s) = self.state.lock() {
            s.now += d;
            s.sleeps.push(d);
        }
    }
}

/// Sleeps away the remainder of a fixed frame period.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    period: Duration,
    last: Duration,
}

impl FramePacer {
    /// Start pacing at `fps`, measuring from the clock's current time.
    pub fn new(fps: Fps, clock: &dyn Clock) -> Self {
        Self::with_period(fps.frame_duration(), clock)
    }

    /// Start pacing with an explicit period.
    pub fn with_period(period: Duration, clock: &dyn Clock) -> Self {
        Self {
            period,
            last: clock.now(),
        }
    }

    /// Target frame period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Sleep for `period - elapsed` when positive, then restart the measurement.
    ///
    /// Returns the duration actually slept (zero for an overrunning frame).
    pub fn pace(&mut self, clock: &dyn Clock) -> Duration {
        let elapsed = clock.now().saturating_sub(self.last);
        let slept = match self.period.checked_sub(elapsed) {
            Some(rest) if !rest.is_zero() => {
                clock.sleep(rest);
                rest
            }
            _ => Duration::ZERO,
        };
        self.last = clock.now();
        slept
    }

    /// Hold the current image for `frames` periods (part pauses).
    pub fn hold(&mut self, frames: u32, clock: &dyn Clock) {
        if frames > 0 {
            clock.sleep(self.period * frames);
        }
        self.last = clock.now();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pacing.rs"]
mod tests;
