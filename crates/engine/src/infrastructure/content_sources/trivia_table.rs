//! Challenge Arena question bank.
//!
//! Answers and reveals are coin flips. There is no ground truth for these
//! questions, so a round's winner is effectively random.

use async_trait::async_trait;
use island_domain::{Answer, Islander};
use std::sync::Arc;

use crate::infrastructure::ports::{ContentError, RandomPort, TriviaSource};

pub const QUESTIONS: [&str; 10] = [
    "If you had to choose between saving a loved one or saving the world, what would you do?",
    "What's your stance on artificial intelligence and its impact on humanity?",
    "Is it better to be loved or feared?",
    "Would you rather have the power to read minds or control time?",
    "What's your definition of true happiness?",
    "Is it better to be a big fish in a small pond or a small fish in a big pond?",
    "What's more important: intelligence or wisdom?",
    "Would you rather be right or be kind?",
    "What's your take on the nature of consciousness?",
    "Is free will real or an illusion?",
];

pub struct StaticTriviaSource {
    random: Arc<dyn RandomPort>,
}

impl StaticTriviaSource {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl TriviaSource for StaticTriviaSource {
    async fn next_question(&self, _a: &Islander, _b: &Islander) -> Result<String, ContentError> {
        let last = QUESTIONS.len() as i32 - 1;
        let idx = self.random.gen_range(0, last).clamp(0, last) as usize;
        QUESTIONS
            .get(idx)
            .map(|q| q.to_string())
            .ok_or(ContentError::Empty)
    }

    async fn answer_for(
        &self,
        _participant: &Islander,
        _question: &str,
    ) -> Result<Answer, ContentError> {
        Ok(Answer::from_draw(self.random.gen_unit()))
    }

    async fn reveal_correct_answer(&self, _question: &str) -> Result<Answer, ContentError> {
        Ok(Answer::from_draw(self.random.gen_unit()))
    }
}
