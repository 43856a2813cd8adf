//! Operation timing for debug logs.

use std::{
    fmt,
    time::{Duration, Instant},
};

/// A timer that measures how long an operation takes, across one or more runs.
///
/// Compositing functions keep one timer per stage and log them at *debug* level when they
/// finish, using the [`fmt::Display`] implementation.
pub struct Timer {
    name: &'static str,
    durations: Vec<Duration>,
}

impl Timer {
    /// Creates a new timer.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            durations: Vec::new(),
        }
    }

    /// Invokes a closure, measuring and recording the time it takes.
    pub fn time<T>(&mut self, timee: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        timee()
    }

    /// Starts timing an operation using a drop guard.
    ///
    /// When the returned [`TimerGuard`] is dropped, the time between the call to `start` and the
    /// drop is measured and recorded.
    pub fn start(&mut self) -> TimerGuard<'_> {
        TimerGuard {
            start: Instant::now(),
            timer: self,
        }
    }

    /// Returns the number of recorded runs.
    pub fn runs(&self) -> usize {
        self.durations.len()
    }

    /// Returns the sum of all recorded durations.
    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }
}

/// Displays the number of runs and their average duration.
impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.runs();
        if len == 0 {
            return write!(f, "{}: -", self.name);
        }
        let avg_ms = self.total().as_secs_f32() * 1000.0 / len as f32;
        write!(f, "{}: {len}x{avg_ms:.01}ms", self.name)
    }
}

/// Guard returned by [`Timer::start`]. Stops timing the operation when dropped.
pub struct TimerGuard<'a> {
    start: Instant,
    timer: &'a mut Timer,
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        self.timer.durations.push(self.start.elapsed());
    }
}
