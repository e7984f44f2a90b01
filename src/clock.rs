//! Time sources and the fixed-cadence gate for the simulation step.

use std::time::Instant;

/// Monotonic nanosecond timestamps.
pub trait Clock {
    fn now_nanos(&self) -> u64;
}

/// Nanoseconds elapsed since the clock was created.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// A clock that only moves when told to. Handy for replays and tests.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: std::cell::Cell<u64>,
}

impl ManualClock {
    pub fn starting_at(now: u64) -> Self {
        ManualClock { now: std::cell::Cell::new(now) }
    }

    pub fn set(&self, now: u64) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: u64) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.now.get()
    }
}

/// Accepts at most one step per `interval`, however often it is asked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedStep {
    pub interval: u64,
    pub next_due: u64,
}

impl FixedStep {
    pub fn new(interval: u64) -> Self {
        FixedStep { interval, next_due: 0 }
    }

    /// `true` when a step should run at `now`; schedules the next one.
    /// Missed steps are dropped, not caught up.
    pub fn accept(&mut self, now: u64) -> bool {
        if now > self.next_due {
            self.next_due = now + self.interval;
            true
        } else {
            false
        }
    }

    pub fn shift(&mut self, delta: u64) {
        self.next_due += delta;
    }
}
