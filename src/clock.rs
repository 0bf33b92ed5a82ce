//! Wall-clock source used for payload timestamps and expiry checks

use chrono::Utc;

/// Time source, injectable so expiry can be tested without sleeping
pub trait Clock: Send + Sync {
    /// Current time in whole seconds since the Unix epoch
    fn now_unix_seconds(&self) -> i64;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock frozen at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl FixedClock {
    /// A clock `seconds` later than this one, pinned at the `i64` bounds
    pub fn advanced_by(self, seconds: i64) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}

impl Clock for FixedClock {
    fn now_unix_seconds(&self) -> i64 {
        self.0
    }
}
