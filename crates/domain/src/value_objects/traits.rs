//! Personality trait sliders
//!
//! Islanders carry a set of named sliders (confidence, humor, intelligence,
//! ...) valued 1-10. The set of names differs between features (the Love
//! Shack uses five social sliders, the Arena uses intelligence, intuition and
//! adaptability) so the sliders are stored by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DomainError;

/// A single slider value, always within `1..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TraitLevel(u8);

impl TraitLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "Trait level must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    /// Nearest valid level
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for TraitLevel {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TraitLevel> for u8 {
    fn from(level: TraitLevel) -> Self {
        level.0
    }
}

impl fmt::Display for TraitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Named trait sliders, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitSliders(BTreeMap<String, TraitLevel>);

impl TraitSliders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert; names are lowercased.
    pub fn with(mut self, name: impl Into<String>, level: TraitLevel) -> Self {
        self.set(name, level);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, level: TraitLevel) {
        self.0.insert(name.into().to_lowercase(), level);
    }

    pub fn get(&self, name: &str) -> Option<TraitLevel> {
        self.0.get(&name.to_lowercase()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TraitLevel)> {
        self.0.iter().map(|(name, level)| (name.as_str(), *level))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as prompt bullet lines, e.g. `- Humor: 7/10`
    pub fn to_prompt_lines(&self) -> String {
        self.iter()
            .map(|(name, level)| format!("- {}: {}", capitalize(name), level))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
