//! Testability ports for injecting time and randomness.

use chrono::{DateTime, Utc};

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait RandomPort: Send + Sync {
    /// Inclusive range
    fn gen_range(&self, min: i32, max: i32) -> i32;
    /// Uniform draw in `[0.0, 1.0)`
    fn gen_unit(&self) -> f64;
}
