//! Encounter countdown
//!
//! A whole-second countdown owned by the encounter and queried rather than
//! captured. The owner drives it by calling [`Countdown::tick`] once per
//! second; expiry is reported exactly once, on the tick that moves the
//! remaining time from 1 to 0.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownState {
    /// Never started
    Idle,
    /// Ticking
    Running,
    /// Halted by `stop()` before reaching zero
    Stopped,
    /// Reached zero
    Expired,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// One second elapsed, time remains
    Ticked { remaining: u32 },
    /// The 1 -> 0 transition. Returned once per run.
    Expired,
    /// The countdown is not running; nothing changed
    Idle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    state: CountdownState,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            remaining: 0,
            state: CountdownState::Idle,
        }
    }

    /// Begin ticking from `duration_secs`.
    ///
    /// # Errors
    /// - `ClockAlreadyRunning` if the countdown is ticking
    /// - `Validation` for a zero duration
    pub fn start(&mut self, duration_secs: u32) -> Result<(), DomainError> {
        if self.state == CountdownState::Running {
            return Err(DomainError::ClockAlreadyRunning);
        }
        if duration_secs == 0 {
            return Err(DomainError::validation("Countdown duration must be positive"));
        }
        self.remaining = duration_secs;
        self.state = CountdownState::Running;
        Ok(())
    }

    /// Advance by one second. Never goes below zero.
    pub fn tick(&mut self) -> CountdownTick {
        if self.state != CountdownState::Running {
            return CountdownTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = CountdownState::Expired;
            CountdownTick::Expired
        } else {
            CountdownTick::Ticked {
                remaining: self.remaining,
            }
        }
    }

    /// Halt ticking. Idempotent; an expired countdown stays expired.
    pub fn stop(&mut self) {
        if self.state == CountdownState::Running {
            self.state = CountdownState::Stopped;
        }
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[inline]
    pub fn state(&self) -> CountdownState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(duration: u32) -> Countdown {
        let mut countdown = Countdown::new();
        countdown.start(duration).expect("start");
        countdown
    }

    #[test]
    fn start_twice_fails_fast() {
        let mut countdown = started(30);
        assert_eq!(countdown.start(10), Err(DomainError::ClockAlreadyRunning));
        assert_eq!(countdown.remaining(), 30);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let mut countdown = Countdown::new();
        assert!(matches!(
            countdown.start(0),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn n_ticks_leave_max_zero_d_minus_n() {
        for ticks in 0..40u32 {
            let mut countdown = started(30);
            for _ in 0..ticks {
                countdown.tick();
            }
            assert_eq!(countdown.remaining(), 30u32.saturating_sub(ticks));
        }
    }

    #[test]
    fn expiry_fires_exactly_once_on_one_to_zero() {
        let mut countdown = started(3);
        assert_eq!(countdown.tick(), CountdownTick::Ticked { remaining: 2 });
        assert_eq!(countdown.tick(), CountdownTick::Ticked { remaining: 1 });
        assert_eq!(countdown.tick(), CountdownTick::Expired);

        let expiries = (0..10)
            .map(|_| countdown.tick())
            .filter(|tick| *tick == CountdownTick::Expired)
            .count();
        assert_eq!(expiries, 0);
        assert_eq!(countdown.remaining(), 0);
        assert!(countdown.is_expired());
    }

    #[test]
    fn stop_is_idempotent_and_halts_ticking() {
        let mut countdown = started(10);
        assert!(countdown.is_running());
        countdown.tick();
        countdown.stop();
        assert!(!countdown.is_running());
        countdown.stop();
        assert_eq!(countdown.tick(), CountdownTick::Idle);
        assert_eq!(countdown.remaining(), 9);
        assert_eq!(countdown.state(), CountdownState::Stopped);
    }

    #[test]
    fn idle_countdown_does_not_tick() {
        let mut countdown = Countdown::new();
        assert!(!countdown.is_running());
        assert_eq!(countdown.tick(), CountdownTick::Idle);
    }
}
