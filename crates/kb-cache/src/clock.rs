//! Time sources for cache expiry.

use std::time::SystemTime;
#[cfg(feature = "mock")]
use std::{sync::Mutex, time::Duration};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> SystemTime;
}

/// [`Clock`] backed by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually driven [`Clock`] for deterministic tests.
///
/// Starts at the Unix epoch and only moves when [`advance`](Self::advance)
/// is called.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use kb_cache::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(clock.now().duration_since(start).unwrap().as_secs(), 10);
/// ```
#[cfg(feature = "mock")]
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

#[cfg(feature = "mock")]
impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Mutex::new(SystemTime::UNIX_EPOCH),
        }
    }
}

#[cfg(feature = "mock")]
impl ManualClock {
    /// Create a clock positioned at the Unix epoch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(feature = "mock")]
impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[cfg(feature = "mock")]
    #[test]
    fn test_manual_clock_advances_only_on_request() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), SystemTime::UNIX_EPOCH);

        clock.advance(Duration::from_secs(90));
        assert_eq!(
            clock.now(),
            SystemTime::UNIX_EPOCH + Duration::from_secs(90)
        );
    }
}
