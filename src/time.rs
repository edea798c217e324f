//! # Time

use std::time::Duration;
use std::time::Instant;

/// # Time
///
/// Frame timing passed to [crate::Application::update].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Time {
    delta: Duration,
    elapsed: Duration,
    frame: u64,
}

impl Time {
    /// Returns the time since the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Returns the time since the previous frame in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Returns the total time of all the frames so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the total time of all the frames so far in seconds.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Returns the number of the current frame, starting from 1.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Produces a [Time] per frame. Deltas are capped so a stall (window drag, breakpoint) doesn't
/// turn into one huge step.
#[derive(Debug)]
pub(crate) struct Clock {
    last: Instant,
    max_delta: Duration,
    time: Time,
}

impl Clock {
    pub(crate) fn new(now: Instant, max_delta: Duration) -> Self {
        Self {
            last: now,
            max_delta,
            time: Time::default(),
        }
    }

    pub(crate) fn tick(&mut self, now: Instant) -> Time {
        let delta = now.saturating_duration_since(self.last).min(self.max_delta);
        self.last = now;

        self.time = Time {
            delta,
            elapsed: self.time.elapsed + delta,
            frame: self.time.frame + 1,
        };

        self.time
    }
}
