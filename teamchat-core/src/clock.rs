//! Clock abstraction
//!
//! Every time-dependent operation (cooldown checks, scheduled approvals,
//! message timestamps) reads the current time through [`Clock`], injected
//! at construction. The core holds no timers of its own; callers poll on
//! their own schedule.

use crate::core_store::model::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Source of "now" for the core modules
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Hand-advanced clock for deterministic tests
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Start the clock at the given point in time
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            millis: AtomicU64::new(start.as_millis()),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute point in time
    pub fn set(&self, to: Timestamp) {
        self.millis.store(to.as_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new(Timestamp::from_millis(1_000));
        assert_eq!(clock.now(), Timestamp::from_millis(1_000));

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), Timestamp::from_millis(6_000));

        clock.set(Timestamp::from_millis(100));
        assert_eq!(clock.now(), Timestamp::from_millis(100));
    }
}
