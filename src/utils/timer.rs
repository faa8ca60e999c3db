use std::time::{Duration, Instant};

/// Turn clock as the search sees it.
pub trait Clock {
    /// Milliseconds spent on the current turn so far.
    fn elapsed_ms(&self) -> u64;
    /// Milliseconds left on the mover's clock.
    fn remaining_ms(&self) -> u64;
}

/// Wall clock started at the beginning of a turn with the time the mover had
/// left. `remaining_ms` counts down as the turn goes on.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
    remaining_at_start: u64,
}

impl Timer {
    pub fn new(remaining_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            remaining_at_start: remaining_ms,
        }
    }

    /// Never asks the search to stop. Depth limits still apply.
    pub fn unbounded() -> Self {
        Self::new(u64::MAX)
    }

    /// A timer under which the search stops deepening once roughly
    /// `move_time_ms` has been spent, given the stop rule
    /// `elapsed > remaining / divisor`.
    pub fn for_move_time(move_time_ms: u64, divisor: u64) -> Self {
        Self::new(move_time_ms.saturating_mul(divisor.saturating_add(1)))
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Clock for Timer {
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn remaining_ms(&self) -> u64 {
        self.remaining_at_start.saturating_sub(self.elapsed_ms())
    }
}

/// Clock frozen at fixed readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock {
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
}

impl Clock for FixedClock {
    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }
}
