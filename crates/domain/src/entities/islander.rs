//! Islander entity - the AI persona a user creates and sends into encounters
//!
//! Islanders are owned by the external profile store. The engine only reads
//! them: names and trait sliders feed prompts, `score` seeds chat spark points.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::ids::IslanderId;
use crate::value_objects::TraitSliders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Other,
}

impl Gender {
    /// Gender the Love Shack pairs this islander with
    pub fn match_preference(&self) -> Gender {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female | Gender::Other => Gender::Male,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(DomainError::parse(format!("Unknown gender: {}", s))),
        }
    }
}

/// Dating status on the island
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IslanderStatus {
    #[default]
    Single,
    Taken,
    #[serde(other)]
    Unknown,
}

/// Appearance choices from the creation wizard (avatar prompt input)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    pub face_shape: String,
    pub skin_tone: String,
    pub hair_style: String,
    pub hair_color: String,
    pub outfit_style: String,
}

/// A user-created islander profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Islander {
    pub id: IslanderId,
    /// Wallet address of the owning user
    #[serde(default)]
    pub wallet_address: Option<String>,
    pub name: String,
    pub gender: Gender,
    #[serde(default)]
    pub personality_vibe: String,
    #[serde(default)]
    pub traits: TraitSliders,
    #[serde(default)]
    pub appearance: Option<Appearance>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub status: IslanderStatus,
    /// XP shown on profile cards; seeds chat spark points
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default)]
    pub intro_line: Option<String>,
    #[serde(default)]
    pub signature_move: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Islander {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: IslanderId::new(),
            wallet_address: None,
            name: name.into(),
            gender,
            personality_vibe: String::new(),
            traits: TraitSliders::new(),
            appearance: None,
            avatar_url: None,
            status: IslanderStatus::Single,
            score: 0,
            popularity: 0,
            intro_line: None,
            signature_move: None,
            created_at: None,
        }
    }

    pub fn with_wallet(mut self, address: impl Into<String>) -> Self {
        self.wallet_address = Some(address.into());
        self
    }

    pub fn with_personality(mut self, vibe: impl Into<String>) -> Self {
        self.personality_vibe = vibe.into();
        self
    }

    pub fn with_traits(mut self, traits: TraitSliders) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub fn with_popularity(mut self, popularity: i64) -> Self {
        self.popularity = popularity;
        self
    }

    pub fn with_status(mut self, status: IslanderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_single(&self) -> bool {
        self.status == IslanderStatus::Single
    }

    /// Prompt block describing this islander
    pub fn persona_summary(&self) -> String {
        let mut summary = format!(
            "{}, a {} islander\n- Personality: {}",
            self.name,
            self.gender,
            if self.personality_vibe.is_empty() {
                "easygoing"
            } else {
                &self.personality_vibe
            }
        );
        if !self.traits.is_empty() {
            summary.push('\n');
            summary.push_str(&self.traits.to_prompt_lines());
        }
        summary
    }
}
