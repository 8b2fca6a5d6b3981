//! Encounter timing and scoring settings
//!
//! Defaults reproduce the live game: 30 second encounters, a chat line every
//! 2.5 seconds after a one second "typing" pause, and battle steps every two
//! seconds. A provider gets ten seconds to answer before the exchange fails.
//! Settings are serde-friendly so they can be loaded from config.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Opening line spoken by the first participant when a chat starts
pub const DEFAULT_OPENING_LINE: &str = "Hey there! Ready to chat? 💖";

/// Number of question rounds in a battle
pub const BATTLE_ROUND_CAP: u32 = 5;

/// Longest a provider may take to supply one exchange, in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Spark points awarded to the chat winner
pub const WIN_POINTS: i64 = 100;

/// Spark points taken from the chat loser
pub const LOSS_POINTS: i64 = 50;

/// Timing and scoring knobs for one encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSettings {
    /// Countdown length in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,

    /// Interval between exchange starts, in milliseconds
    pub cadence_ms: u64,

    /// Simulated typing pause before content is fetched, in milliseconds
    pub typing_delay_ms: u64,

    /// Provider deadline per exchange, in milliseconds. Counted after the
    /// typing pause.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Round cap (battles only). `None` means time-limited only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_cap: Option<u32>,

    /// Line appended for the first participant on activation (chats only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_line: Option<String>,

    /// Points added to the chat winner
    #[serde(default = "default_win_points")]
    pub win_points: i64,

    /// Points removed from the chat loser
    #[serde(default = "default_loss_points")]
    pub loss_points: i64,
}

fn default_duration_secs() -> u32 {
    30
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

fn default_win_points() -> i64 {
    WIN_POINTS
}

fn default_loss_points() -> i64 {
    LOSS_POINTS
}

impl EncounterSettings {
    /// Love Shack chat defaults
    pub fn chat() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            cadence_ms: 2_500,
            typing_delay_ms: 1_000,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            round_cap: None,
            opening_line: Some(DEFAULT_OPENING_LINE.to_string()),
            win_points: WIN_POINTS,
            loss_points: LOSS_POINTS,
        }
    }

    /// Challenge Arena battle defaults
    pub fn battle() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            cadence_ms: 2_000,
            typing_delay_ms: 1_000,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            round_cap: Some(BATTLE_ROUND_CAP),
            opening_line: None,
            win_points: WIN_POINTS,
            loss_points: LOSS_POINTS,
        }
    }

    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn with_cadence_ms(mut self, ms: u64) -> Self {
        self.cadence_ms = ms;
        self
    }

    pub fn with_typing_delay_ms(mut self, ms: u64) -> Self {
        self.typing_delay_ms = ms;
        self
    }

    pub fn with_fetch_timeout_ms(mut self, ms: u64) -> Self {
        self.fetch_timeout_ms = ms;
        self
    }

    pub fn without_opening_line(mut self) -> Self {
        self.opening_line = None;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.duration_secs == 0 {
            return Err(DomainError::validation("Encounter duration must be positive"));
        }
        if self.cadence_ms == 0 {
            return Err(DomainError::validation("Exchange cadence must be positive"));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(DomainError::validation("Fetch timeout must be positive"));
        }
        if self.round_cap == Some(0) {
            return Err(DomainError::validation("Round cap must be positive"));
        }
        if self.win_points < 0 || self.loss_points < 0 {
            return Err(DomainError::validation("Point adjustments must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_defaults_match_live_game() {
        let settings = EncounterSettings::chat();
        assert_eq!(settings.duration_secs, 30);
        assert_eq!(settings.cadence_ms, 2_500);
        assert_eq!(settings.typing_delay_ms, 1_000);
        assert_eq!(settings.fetch_timeout_ms, 10_000);
        assert_eq!(settings.round_cap, None);
        assert_eq!(settings.opening_line.as_deref(), Some(DEFAULT_OPENING_LINE));
    }

    #[test]
    fn battle_defaults_cap_rounds() {
        let settings = EncounterSettings::battle();
        assert_eq!(settings.round_cap, Some(5));
        assert!(settings.opening_line.is_none());
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let settings = EncounterSettings::chat().with_duration_secs(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: EncounterSettings =
            serde_json::from_str(r#"{"cadence_ms": 1000, "typing_delay_ms": 200}"#)
                .expect("deserialize");
        assert_eq!(settings.duration_secs, 30);
        assert_eq!(settings.win_points, 100);
        assert_eq!(settings.loss_points, 50);
        assert_eq!(settings.fetch_timeout_ms, DEFAULT_FETCH_TIMEOUT_MS);
    }

    #[test]
    fn builders_override_timings() {
        let settings = EncounterSettings::battle()
            .with_cadence_ms(500)
            .with_typing_delay_ms(100)
            .with_fetch_timeout_ms(2_000);
        assert_eq!(settings.cadence_ms, 500);
        assert_eq!(settings.typing_delay_ms, 100);
        assert_eq!(settings.fetch_timeout_ms, 2_000);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_timings() {
        assert!(EncounterSettings::chat().with_cadence_ms(0).validate().is_err());
        assert!(EncounterSettings::chat()
            .with_fetch_timeout_ms(0)
            .validate()
            .is_err());
    }
}
