//! Transcript records
//!
//! A transcript is the append-only, chronological list of turns in an
//! encounter. Turns are never edited after they are appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::TurnId;

/// Position of a participant within an encounter.
///
/// Seat A is the first participant supplied and acts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    A,
    B,
}

impl Seat {
    /// The other participant
    pub fn other(self) -> Seat {
        match self {
            Seat::A => Seat::B,
            Seat::B => Seat::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::A => 0,
            Seat::B => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::A => f.write_str("participant A"),
            Seat::B => f.write_str("participant B"),
        }
    }
}

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Participant(Seat),
    /// Narrator: questions, reveals and error notices
    System,
}

impl Speaker {
    pub fn seat(&self) -> Option<Seat> {
        match self {
            Speaker::Participant(seat) => Some(*seat),
            Speaker::System => None,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Speaker::System)
    }
}

/// What a turn contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnKind {
    /// Chat dialogue line
    Line,
    /// Battle question (system)
    Question,
    /// Battle answer
    Answer,
    /// Correct-answer reveal (system)
    Reveal,
    /// Content fetch failure notice (system)
    Error,
}

/// One atomic contribution to the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub speaker: Speaker,
    pub kind: TurnKind,
    pub content: String,
    pub emitted_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(
        speaker: Speaker,
        kind: TurnKind,
        content: impl Into<String>,
        emitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TurnId::new(),
            speaker,
            kind,
            content: content.into(),
            emitted_at,
        }
    }

    pub fn system(kind: TurnKind, content: impl Into<String>, emitted_at: DateTime<Utc>) -> Self {
        Self::new(Speaker::System, kind, content, emitted_at)
    }
}

/// True when the non-system speakers in `turns` strictly alternate.
pub fn participants_alternate(turns: &[Turn]) -> bool {
    let seats: Vec<Seat> = turns.iter().filter_map(|t| t.speaker.seat()).collect();
    seats.windows(2).all(|pair| pair[0] != pair[1])
}
