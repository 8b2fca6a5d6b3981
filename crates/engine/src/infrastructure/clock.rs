//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_unit(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing: `gen_range` returns `min + offset` (clamped),
/// `gen_unit` always returns `unit`.
#[cfg(test)]
pub struct FixedRandom {
    pub offset: i32,
    pub unit: f64,
}

#[cfg(test)]
impl FixedRandom {
    /// Never triggers a vibe shift, always lands the coin on seat B, always
    /// answers No, and picks the first table entry.
    pub fn high() -> Self {
        Self {
            offset: 0,
            unit: 0.99,
        }
    }

    pub fn low() -> Self {
        Self {
            offset: 0,
            unit: 0.0,
        }
    }
}

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        (min + self.offset).min(max)
    }

    fn gen_unit(&self) -> f64 {
        self.unit
    }
}
