//! Time source for every polling loop.

use std::time::{Duration, Instant};

/// Monotonic time plus blocking sleep.
///
/// All waits in the launcher go through this trait so tests can advance
/// time without real delays.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&self, duration: Duration);

    /// Time elapsed since `start` according to this clock.
    fn elapsed_since(&self, start: Instant) -> Duration {
        self.now().saturating_duration_since(start)
    }
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_sleep_advances_time() {
        let clock = SystemClock;
        let start = clock.now();
        clock.sleep(Duration::from_millis(5));
        assert!(clock.elapsed_since(start) >= Duration::from_millis(5));
    }
}
