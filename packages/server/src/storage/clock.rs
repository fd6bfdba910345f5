//! Clock abstraction for record timestamps.
//!
//! Repositories take a [`ClockSource`] instead of reading the system time
//! directly, so tests can pin `created_at` to a known instant.

use chrono::{DateTime, Utc};

/// Abstraction over the wall clock for dependency injection.
pub trait ClockSource: Send + Sync {
    /// The current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Default clock source that reads the real system time.
#[derive(Debug, Clone)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
