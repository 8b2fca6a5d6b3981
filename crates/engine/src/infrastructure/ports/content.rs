//! Content provider ports.
//!
//! Providers supply the text of each turn. They may be static tables or remote
//! generation calls; either way a failure only costs the current exchange.

use async_trait::async_trait;
use island_domain::{Answer, Islander, Seat, Turn, Vibe};

use super::error::ContentError;

/// Everything a dialogue provider may use to produce the next line.
#[derive(Debug, Clone)]
pub struct DialogueContext {
    pub vibe: Vibe,
    pub speaker_seat: Seat,
    /// Islander whose line is being produced
    pub speaker: Islander,
    /// Islander being spoken to
    pub listener: Islander,
    /// Transcript so far, oldest first
    pub transcript: Vec<Turn>,
}

impl DialogueContext {
    /// Display name for a seat in this conversation
    pub fn name_of(&self, seat: Seat) -> &str {
        if seat == self.speaker_seat {
            &self.speaker.name
        } else {
            &self.listener.name
        }
    }
}

/// Chat lines for the Love Shack.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DialogueSource: Send + Sync {
    async fn next_line(&self, context: &DialogueContext) -> Result<String, ContentError>;
}

/// Questions and answers for the Challenge Arena.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriviaSource: Send + Sync {
    async fn next_question(&self, a: &Islander, b: &Islander) -> Result<String, ContentError>;

    /// Simulated answer; not a reasoning step.
    async fn answer_for(&self, participant: &Islander, question: &str)
        -> Result<Answer, ContentError>;

    /// There is no ground truth, so this may be arbitrary.
    async fn reveal_correct_answer(&self, question: &str) -> Result<Answer, ContentError>;
}
