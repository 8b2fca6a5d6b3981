//! Yes/No answers for Challenge Arena questions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::random::coin_flip;

/// An answer to a battle question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Uniform Yes/No from a single draw
    pub fn from_draw(draw: f64) -> Self {
        if coin_flip(draw) {
            Answer::Yes
        } else {
            Answer::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Answer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_end_matches(['.', '!']).to_lowercase();
        match normalized.as_str() {
            "yes" | "y" => Ok(Answer::Yes),
            "no" | "n" => Ok(Answer::No),
            _ => Err(DomainError::parse(format!("Not a yes/no answer: {}", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_loose_input() {
        assert_eq!(" Yes. ".parse::<Answer>().ok(), Some(Answer::Yes));
        assert_eq!("no!".parse::<Answer>().ok(), Some(Answer::No));
        assert!("maybe".parse::<Answer>().is_err());
    }

    #[test]
    fn draw_maps_to_both_answers() {
        assert_eq!(Answer::from_draw(0.1), Answer::Yes);
        assert_eq!(Answer::from_draw(0.7), Answer::No);
    }
}
