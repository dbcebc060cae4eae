//! Time sources for lease expiry.
//!
//! Lease expiry is computed from a [`Clock`] rather than the system time
//! directly, so pools can be driven by a manual clock in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time, in fractional seconds since the UNIX epoch.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> f64;
}

/// Wall-clock time from [`SystemTime`].
///
/// # Examples
///
/// ```
/// use idserver::clock::{Clock, SystemClock};
///
/// assert!(SystemClock.now() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle
/// while a pool owns another.
///
/// # Examples
///
/// ```
/// use idserver::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(100.0);
/// let handle = clock.clone();
/// handle.advance(5.0);
/// assert_eq!(clock.now(), 105.0);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub fn new(start: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(start.to_bits())),
        }
    }

    /// Sets the clock to `now`.
    pub fn set(&self, now: f64) {
        self.bits.store(now.to_bits(), Ordering::SeqCst);
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
