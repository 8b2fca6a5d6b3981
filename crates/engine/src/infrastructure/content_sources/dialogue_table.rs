//! Canned Love Shack lines, keyed by vibe.

use async_trait::async_trait;
use island_domain::Vibe;
use std::sync::Arc;

use crate::infrastructure::ports::{ContentError, DialogueContext, DialogueSource, RandomPort};

/// Three lines per vibe; a line is drawn uniformly from the current vibe.
pub fn lines_for(vibe: Vibe) -> &'static [&'static str] {
    match vibe {
        Vibe::Romantic => &[
            "The sunset looks magical... just like your eyes ✨",
            "You make my heart skip a beat every time you smile 💖",
            "I've never felt this way about anyone before...",
        ],
        Vibe::Flirty => &[
            "Is it hot in here or is it just you? 🔥",
            "That swimsuit looks amazing on you 😘",
            "Maybe we should take a midnight swim together?",
        ],
        Vibe::Fun => &[
            "Let's have a dance party! 💃🕺",
            "Race you to the water! 🏃‍♂️",
            "You're hilarious! Tell me another joke 😂",
        ],
        Vibe::Boring => &[
            "So... what's your favorite color? 😕",
            "The weather is... nice today.",
            "I had cereal for breakfast...",
        ],
        Vibe::Angry => &[
            "I saw you talking to them earlier 😠",
            "Why are you being like this?",
            "Maybe we need some space...",
        ],
    }
}

pub struct StaticDialogueSource {
    random: Arc<dyn RandomPort>,
}

impl StaticDialogueSource {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl DialogueSource for StaticDialogueSource {
    async fn next_line(&self, context: &DialogueContext) -> Result<String, ContentError> {
        let lines = lines_for(context.vibe);
        let last = lines.len().saturating_sub(1) as i32;
        let idx = self.random.gen_range(0, last).clamp(0, last) as usize;
        lines
            .get(idx)
            .map(|line| line.to_string())
            .ok_or(ContentError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use island_domain::{Gender, Islander, Seat};

    fn context(vibe: Vibe) -> DialogueContext {
        DialogueContext {
            vibe,
            speaker_seat: Seat::B,
            speaker: Islander::new("Sarah", Gender::Female),
            listener: Islander::new("Mike", Gender::Male),
            transcript: Vec::new(),
        }
    }

    #[test]
    fn every_vibe_has_lines() {
        for vibe in Vibe::all() {
            assert_eq!(lines_for(*vibe).len(), 3);
        }
    }

    #[tokio::test]
    async fn draws_from_current_vibe() {
        let source = StaticDialogueSource::new(Arc::new(FixedRandom {
            offset: 1,
            unit: 0.5,
        }));
        let line = source
            .next_line(&context(Vibe::Boring))
            .await
            .expect("line");
        assert_eq!(line, "The weather is... nice today.");
    }

    #[tokio::test]
    async fn out_of_range_draw_is_clamped() {
        let source = StaticDialogueSource::new(Arc::new(FixedRandom {
            offset: 50,
            unit: 0.5,
        }));
        let line = source.next_line(&context(Vibe::Angry)).await.expect("line");
        assert_eq!(line, "Maybe we need some space...");
    }
}
