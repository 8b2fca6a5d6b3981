//! Conversational vibe for Love Shack chats
//!
//! The vibe is the chat encounter's mood overlay. It belongs to the encounter
//! (not to individual turns), selects the dialogue pool for the next line and
//! drives the sender bubble styling. It never influences who wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::random::{pick_index, Roll};

/// Chance that the vibe changes after a completed exchange
pub const VIBE_SHIFT_PROBABILITY: f64 = 0.2;

/// Current tone of a chat encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vibe {
    /// Warm, heartfelt (initial vibe)
    #[default]
    Romantic,
    /// Playful, teasing
    Flirty,
    /// Lighthearted, silly
    Fun,
    /// Small talk going nowhere
    Boring,
    /// Jealous, hostile
    Angry,
}

impl Vibe {
    /// Get all vibes, in display order
    pub fn all() -> &'static [Vibe] {
        &[
            Vibe::Romantic,
            Vibe::Flirty,
            Vibe::Fun,
            Vibe::Boring,
            Vibe::Angry,
        ]
    }

    /// Get a display name for the vibe
    pub fn label(&self) -> &'static str {
        match self {
            Vibe::Romantic => "Romantic",
            Vibe::Flirty => "Flirty",
            Vibe::Fun => "Fun",
            Vibe::Boring => "Boring",
            Vibe::Angry => "Angry",
        }
    }

    /// Get an emoji representation for UI
    pub fn emoji(&self) -> &'static str {
        match self {
            Vibe::Romantic => "💖",
            Vibe::Flirty => "😘",
            Vibe::Fun => "🎉",
            Vibe::Boring => "😴",
            Vibe::Angry => "😠",
        }
    }

    /// Tailwind gradient stops for the sender bubble
    pub fn gradient(&self) -> &'static str {
        match self {
            Vibe::Romantic => "from-pink-400 via-rose-400 to-purple-400",
            Vibe::Flirty => "from-orange-400 via-rose-400 to-pink-400",
            Vibe::Fun => "from-amber-400 via-orange-400 to-yellow-400",
            Vibe::Boring => "from-blue-400 via-slate-400 to-gray-400",
            Vibe::Angry => "from-red-500 via-rose-500 to-red-600",
        }
    }

    /// Tone hint for LLM prompts
    pub fn tone(&self) -> &'static str {
        match self {
            Vibe::Romantic => "sincere and romantic",
            Vibe::Flirty => "playful and flirty",
            Vibe::Fun => "silly and lighthearted",
            Vibe::Boring => "awkward and a little dull",
            Vibe::Angry => "jealous and irritated",
        }
    }

    /// Possibly move to a different vibe after an exchange.
    ///
    /// Draws once against [`VIBE_SHIFT_PROBABILITY`]; on a hit, draws again to
    /// choose uniformly among the *other* vibes. Otherwise returns `self`.
    pub fn maybe_shift(self, roll: Roll<'_>) -> Vibe {
        if roll() >= VIBE_SHIFT_PROBABILITY {
            return self;
        }
        let others: Vec<Vibe> = Vibe::all()
            .iter()
            .copied()
            .filter(|vibe| *vibe != self)
            .collect();
        others[pick_index(roll(), others.len())]
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

impl FromStr for Vibe {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "romantic" => Ok(Vibe::Romantic),
            "flirty" => Ok(Vibe::Flirty),
            "fun" => Ok(Vibe::Fun),
            "boring" => Ok(Vibe::Boring),
            "angry" => Ok(Vibe::Angry),
            _ => Err(DomainError::parse(format!("Unknown vibe: {}", s))),
        }
    }
}
